use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::{HISTORY_LIMIT, PointsService};

#[utoipa::path(
    post,
    path = "/puntos/agregar",
    tag = "points",
    request_body = PointsRequest,
    security(
        ("admin_token" = [])
    ),
    responses(
        (status = 200, description = "新余额", body = PointsBalanceResponse),
        (status = 400, description = "积分必须为正", body = ApiErrorResponse),
        (status = 404, description = "客户不存在", body = ApiErrorResponse)
    )
)]
pub async fn add_points(
    points_service: web::Data<PointsService>,
    request: web::Json<PointsRequest>,
) -> Result<HttpResponse> {
    match points_service
        .add_points_by_national_id(request.into_inner())
        .await
    {
        Ok(puntos) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": PointsBalanceResponse { puntos }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/puntos/redimir",
    tag = "points",
    request_body = PointsRequest,
    security(
        ("admin_token" = [])
    ),
    responses(
        (status = 200, description = "新余额", body = PointsBalanceResponse),
        (status = 400, description = "积分必须为正或余额不足", body = ApiErrorResponse),
        (status = 404, description = "客户不存在", body = ApiErrorResponse)
    )
)]
pub async fn redeem_points(
    points_service: web::Data<PointsService>,
    request: web::Json<PointsRequest>,
) -> Result<HttpResponse> {
    match points_service
        .redeem_points_by_national_id(request.into_inner())
        .await
    {
        Ok(puntos) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": PointsBalanceResponse { puntos }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/clientes/{id}/puntos",
    tag = "points",
    params(
        ("id" = i32, Path, description = "客户 ID")
    ),
    responses(
        (status = 200, description = "余额与最近 50 条流水", body = PointsDetailResponse),
        (status = 404, description = "客户不存在", body = ApiErrorResponse)
    )
)]
pub async fn get_points(
    points_service: web::Data<PointsService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match points_service
        .get_balance_and_history(path.into_inner(), HISTORY_LIMIT)
        .await
    {
        Ok(detail) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": detail
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn points_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/puntos")
            .route("/agregar", web::post().to(add_points))
            .route("/redimir", web::post().to(redeem_points)),
    )
    .route("/clientes/{id}/puntos", web::get().to(get_points));
}
