use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::AuthService;

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "admin",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "登录成功，返回管理令牌", body = AdminLoginResponse),
        (status = 401, description = "用户名或密码错误", body = ApiErrorResponse)
    )
)]
pub async fn admin_login(
    auth_service: web::Data<AuthService>,
    request: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.admin_login(request.into_inner()) {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 令牌有效性检查，认证由中间件完成
#[utoipa::path(
    get,
    path = "/admin/ping",
    tag = "admin",
    security(
        ("admin_token" = [])
    ),
    responses(
        (status = 200, description = "令牌有效"),
        (status = 401, description = "令牌缺失或无效", body = ApiErrorResponse)
    )
)]
pub async fn ping() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "ok": true }
    })))
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/login", web::post().to(admin_login))
            .route("/ping", web::get().to(ping)),
    );
}
