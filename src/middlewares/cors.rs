use crate::config::CorsConfig;
use actix_cors::Cors;

/// 按配置生成 CORS 策略，`*` 表示允许任意来源
pub fn create_cors(config: &CorsConfig) -> Cors {
    let allow_any = config.origins.iter().any(|o| o == "*");

    let mut cors = if allow_any {
        Cors::default().allow_any_origin()
    } else {
        config
            .origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors = cors
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        // 前端需要发送 X-Admin-Token
        .allow_any_header()
        .max_age(3600);

    if !allow_any {
        cors = cors.supports_credentials();
    }
    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn test_configured_origin_is_echoed() {
        let config = CorsConfig {
            origins: vec!["http://localhost:3000".to_string()],
        };
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:3000")
        );
    }
}
