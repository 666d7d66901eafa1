pub mod admin;
pub mod auth;
pub mod customer;
pub mod health;
pub mod points;
pub mod promotion;
pub mod roulette;

pub use admin::admin_config;
pub use auth::auth_config;
pub use customer::customer_config;
pub use health::health_config;
pub use points::points_config;
pub use promotion::promotion_config;
pub use roulette::roulette_config;

use crate::error::AppError;
use actix_web::web;

/// 请求体 / 查询参数 / 路径解析失败统一返回 VALIDATION_ERROR
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    );
}

/// 注册全部业务路由
pub fn routes_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(extractor_config)
        .configure(health_config)
        .configure(auth_config)
        .configure(customer_config)
        .configure(promotion_config)
        .configure(roulette_config)
        .configure(points_config)
        .configure(admin_config);
}
