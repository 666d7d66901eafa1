use actix_web::{App, HttpServer, middleware::Logger, web};
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local;  // timestamp in log lines

use caturro_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AdminAuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().map_err(|e| {
        log::error!("Failed to load configuration: {e:#}");
        std::io::Error::other(e.to_string())
    })?;

    // 创建数据库连接池
    let pool = create_pool(&config.database).await.map_err(|e| {
        log::error!("Failed to create database connection pool: {e}");
        std::io::Error::other(e.to_string())
    })?;

    // 运行数据库迁移
    run_migrations(&pool).await.map_err(|e| {
        log::error!("Failed to run database migrations: {e}");
        std::io::Error::other(e.to_string())
    })?;

    if config.admin.token.is_empty() {
        log::warn!("ADMIN_TOKEN is empty; all admin routes will reject requests");
    }

    // 创建服务
    let auth_service = AuthService::new(pool.clone(), config.admin.clone());
    let customer_service = CustomerService::new(pool.clone());
    let promotion_service = PromotionService::new(pool.clone());
    let roulette_service = RouletteService::new(pool.clone());
    let draw_log_service = DrawLogService::new(pool.clone(), config.pagination.max_limit);
    let points_service = PointsService::new(pool.clone());

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let admin_token = config.admin.token.clone();
    let cors_config = config.cors.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(AdminAuthMiddleware::new(admin_token.clone()))
            .wrap(create_cors(&cors_config))
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(customer_service.clone()))
            .app_data(web::Data::new(promotion_service.clone()))
            .app_data(web::Data::new(roulette_service.clone()))
            .app_data(web::Data::new(draw_log_service.clone()))
            .app_data(web::Data::new(points_service.clone()))
            .configure(swagger_config)
            .configure(handlers::routes_config)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
