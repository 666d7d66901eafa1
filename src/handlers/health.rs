use actix_web::{HttpResponse, Result, web};
use serde_json::json;

use crate::models::HealthResponse;

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "服务正常", body = HealthResponse)
    )
)]
pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": HealthResponse {
            status: "ok".to_string(),
            service: "Caturro Café API".to_string(),
        }
    })))
}

pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health));
}
