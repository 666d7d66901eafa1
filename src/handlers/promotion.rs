use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::PromotionService;

#[utoipa::path(
    get,
    path = "/promociones",
    tag = "promotion",
    params(
        ("activas_solo" = Option<bool>, Query, description = "只返回启用的促销，默认 true")
    ),
    responses(
        (status = 200, description = "促销列表", body = [PromotionResponse])
    )
)]
pub async fn list_promotions(
    promotion_service: web::Data<PromotionService>,
    query: web::Query<PromotionListQuery>,
) -> Result<HttpResponse> {
    let active_only = query.activas_solo.unwrap_or(true);
    match promotion_service.list_promotions(active_only).await {
        Ok(promotions) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": promotions
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/promociones",
    tag = "promotion",
    request_body = PromotionRequest,
    security(
        ("admin_token" = [])
    ),
    responses(
        (status = 200, description = "创建成功", body = PromotionResponse),
        (status = 400, description = "参数错误或启用权重和不为正", body = ApiErrorResponse),
        (status = 401, description = "缺少管理令牌", body = ApiErrorResponse)
    )
)]
pub async fn create_promotion(
    promotion_service: web::Data<PromotionService>,
    request: web::Json<PromotionRequest>,
) -> Result<HttpResponse> {
    match promotion_service.create_promotion(request.into_inner()).await {
        Ok(promotion) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": promotion
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/promociones/{id}",
    tag = "promotion",
    params(
        ("id" = i32, Path, description = "促销 ID")
    ),
    request_body = PromotionRequest,
    security(
        ("admin_token" = [])
    ),
    responses(
        (status = 200, description = "更新成功", body = PromotionResponse),
        (status = 400, description = "参数错误或启用权重和不为正", body = ApiErrorResponse),
        (status = 404, description = "促销不存在", body = ApiErrorResponse)
    )
)]
pub async fn update_promotion(
    promotion_service: web::Data<PromotionService>,
    path: web::Path<i32>,
    request: web::Json<PromotionRequest>,
) -> Result<HttpResponse> {
    match promotion_service
        .update_promotion(path.into_inner(), request.into_inner())
        .await
    {
        Ok(promotion) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": promotion
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/promociones/{id}",
    tag = "promotion",
    params(
        ("id" = i32, Path, description = "促销 ID")
    ),
    security(
        ("admin_token" = [])
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "促销不存在", body = ApiErrorResponse)
    )
)]
pub async fn delete_promotion(
    promotion_service: web::Data<PromotionService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match promotion_service.delete_promotion(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "mensaje": "Promoción eliminada" }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn promotion_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/promociones")
            .route("", web::get().to(list_promotions))
            .route("", web::post().to(create_promotion))
            .route("/{id}", web::put().to(update_promotion))
            .route("/{id}", web::delete().to(delete_promotion)),
    );
}

#[cfg(test)]
mod tests {
    use crate::database::test_pool;
    use crate::handlers::test_support::{TEST_ADMIN_TOKEN, app};
    use crate::middlewares::ADMIN_TOKEN_HEADER;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn test_admin_crud_and_public_listing() {
        let app = test::init_service(app(test_pool().await)).await;

        let req = test::TestRequest::post()
            .uri("/promociones")
            .insert_header((ADMIN_TOKEN_HEADER, TEST_ADMIN_TOKEN))
            .set_json(json!({"nombre": "Café gratis", "probabilidad": 20.0}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["activa"], true);
        assert_eq!(body["data"]["color"], "#4B5563");

        let req = test::TestRequest::post()
            .uri("/promociones")
            .insert_header((ADMIN_TOKEN_HEADER, TEST_ADMIN_TOKEN))
            .set_json(json!({"nombre": "Oculta", "activa": false}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/promociones").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri("/promociones?activas_solo=false")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::put()
            .uri(&format!("/promociones/{id}"))
            .insert_header((ADMIN_TOKEN_HEADER, TEST_ADMIN_TOKEN))
            .set_json(json!({"nombre": "Café doble", "probabilidad": 30.0}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["nombre"], "Café doble");

        let req = test::TestRequest::delete()
            .uri(&format!("/promociones/{id}"))
            .insert_header((ADMIN_TOKEN_HEADER, TEST_ADMIN_TOKEN))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/promociones/{id}"))
            .insert_header((ADMIN_TOKEN_HEADER, TEST_ADMIN_TOKEN))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn test_zero_active_sum_is_rejected() {
        let app = test::init_service(app(test_pool().await)).await;
        let req = test::TestRequest::post()
            .uri("/promociones")
            .insert_header((ADMIN_TOKEN_HEADER, TEST_ADMIN_TOKEN))
            .set_json(json!({"nombre": "Nada", "probabilidad": 0.0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_write_without_token_is_unauthorized() {
        let app = test::init_service(app(test_pool().await)).await;
        let req = test::TestRequest::post()
            .uri("/promociones")
            .set_json(json!({"nombre": "Café"}))
            .to_request();
        let err = test::try_call_service(&app, req)
            .await
            .err()
            .expect("unauthorized");
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }
}
