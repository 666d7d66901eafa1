use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::AuthService;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "注册成功", body = CustomerAuthResponse),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse),
        (status = 409, description = "身份证号已注册", body = ApiErrorResponse)
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    match auth_service.register(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = CustomerAuthResponse),
        (status = 401, description = "认证失败", body = ApiErrorResponse)
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login)),
    );
}

#[cfg(test)]
mod tests {
    use crate::database::test_pool;
    use crate::handlers::test_support::app;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn test_register_then_login() {
        let app = test::init_service(app(test_pool().await)).await;

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "cedula": "1712345678",
                "password": "secreto",
                "nombre_completo": "Ana Pérez",
                "semestre": "5"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["cedula"], "1712345678");
        assert_eq!(body["data"]["puntos"], 0);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"cedula": "1712345678", "password": "secreto"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["nombre_completo"], "Ana Pérez");

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"cedula": "1712345678", "password": "otra"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_duplicate_registration_conflicts() {
        let app = test::init_service(app(test_pool().await)).await;
        let payload = json!({
            "cedula": "1712345678",
            "password": "secreto",
            "nombre_completo": "Ana",
            "semestre": "5"
        });

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(&payload)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(&payload)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CONFLICT
        );
    }
}
