use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::{DrawLogService, RouletteService};

const DEFAULT_LIMIT: u64 = 10;
const DEFAULT_CUSTOMER_LIMIT: u64 = 20;

#[utoipa::path(
    post,
    path = "/ruleta/{cliente_id}",
    tag = "roulette",
    params(
        ("cliente_id" = i32, Path, description = "客户 ID")
    ),
    request_body = SpinRequest,
    responses(
        (status = 200, description = "抽奖结果", body = SpinResponse),
        (status = 400, description = "启用权重和不为正", body = ApiErrorResponse),
        (status = 404, description = "客户不存在或没有启用的促销", body = ApiErrorResponse)
    )
)]
pub async fn spin(
    roulette_service: web::Data<RouletteService>,
    path: web::Path<i32>,
    request: web::Json<SpinRequest>,
) -> Result<HttpResponse> {
    match roulette_service
        .spin(path.into_inner(), request.fecha_giro)
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/estadisticas",
    tag = "roulette",
    responses(
        (status = 200, description = "统计信息", body = StatisticsResponse)
    )
)]
pub async fn statistics(roulette_service: web::Data<RouletteService>) -> Result<HttpResponse> {
    match roulette_service.statistics().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/registros",
    tag = "roulette",
    params(
        ("skip" = Option<u64>, Query, description = "跳过条数"),
        ("limit" = Option<u64>, Query, description = "返回条数，默认 10")
    ),
    responses(
        (status = 200, description = "抽奖记录（最新在前）", body = [DrawRecordResponse])
    )
)]
pub async fn list_draws(
    draw_log_service: web::Data<DrawLogService>,
    query: web::Query<SkipLimitQuery>,
) -> Result<HttpResponse> {
    match draw_log_service
        .list_draws(
            query.get_offset(),
            query.limit.unwrap_or(DEFAULT_LIMIT),
            None,
        )
        .await
    {
        Ok(records) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": records
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/clientes/{id}/registros",
    tag = "roulette",
    params(
        ("id" = i32, Path, description = "客户 ID"),
        ("skip" = Option<u64>, Query, description = "跳过条数"),
        ("limit" = Option<u64>, Query, description = "返回条数，默认 20")
    ),
    responses(
        (status = 200, description = "该客户的抽奖记录", body = [DrawRecordResponse]),
        (status = 404, description = "客户不存在", body = ApiErrorResponse)
    )
)]
pub async fn list_customer_draws(
    draw_log_service: web::Data<DrawLogService>,
    path: web::Path<i32>,
    query: web::Query<SkipLimitQuery>,
) -> Result<HttpResponse> {
    match draw_log_service
        .list_draws(
            query.get_offset(),
            query.limit.unwrap_or(DEFAULT_CUSTOMER_LIMIT),
            Some(path.into_inner()),
        )
        .await
    {
        Ok(records) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": records
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn roulette_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/ruleta/{cliente_id}", web::post().to(spin))
        .route("/estadisticas", web::get().to(statistics))
        .route("/registros", web::get().to(list_draws))
        .route("/clientes/{id}/registros", web::get().to(list_customer_draws));
}

#[cfg(test)]
mod tests {
    use crate::database::test_pool;
    use crate::handlers::test_support::{TEST_ADMIN_TOKEN, app};
    use crate::middlewares::ADMIN_TOKEN_HEADER;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    fn admin_post(uri: &str, payload: Value) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((ADMIN_TOKEN_HEADER, TEST_ADMIN_TOKEN))
            .set_json(payload)
    }

    #[actix_web::test]
    async fn test_spin_logs_and_updates_statistics() {
        let app = test::init_service(app(test_pool().await)).await;
        let req = admin_post("/clientes", json!({"nombre_completo": "Ana", "semestre": "3"}));
        let customer: Value = test::call_and_read_body_json(&app, req.to_request()).await;
        let customer = &customer["data"];
        let req = admin_post(
            "/promociones",
            json!({"nombre": "Café gratis", "probabilidad": 10.0}),
        );
        let promo: Value = test::call_and_read_body_json(&app, req.to_request()).await;
        let promo = &promo["data"];
        let customer_id = customer["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri(&format!("/ruleta/{customer_id}"))
            .set_json(json!({"fecha_giro": "2025-09-01T12:00:00Z"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["promocion"]["id"], promo["id"]);
        assert_eq!(
            body["data"]["mensaje"],
            "¡Felicidades Ana! Has ganado: Café gratis"
        );

        let req = test::TestRequest::get().uri("/registros").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let records = body["data"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["cliente"]["id"], customer["id"]);

        let req = test::TestRequest::get()
            .uri(&format!("/clientes/{customer_id}/registros?limit=5"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get().uri("/estadisticas").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["total_clientes"], 1);
        assert_eq!(body["data"]["total_giros"], 1);
        assert_eq!(body["data"]["promociones_top"][0]["nombre"], "Café gratis");
    }

    #[actix_web::test]
    async fn test_spin_errors() {
        let app = test::init_service(app(test_pool().await)).await;

        let req = test::TestRequest::post()
            .uri("/ruleta/99")
            .set_json(json!({"fecha_giro": "2025-09-01T12:00:00Z"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );

        let req = admin_post("/clientes", json!({"nombre_completo": "Ana", "semestre": "3"}));
        let customer: Value = test::call_and_read_body_json(&app, req.to_request()).await;
        let req = test::TestRequest::post()
            .uri(&format!("/ruleta/{}", customer["data"]["id"]))
            .set_json(json!({"fecha_giro": "2025-09-01T12:00:00Z"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[actix_web::test]
    async fn test_unknown_customer_history_and_negative_skip() {
        let app = test::init_service(app(test_pool().await)).await;

        let req = test::TestRequest::get()
            .uri("/clientes/42/registros")
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );

        let req = test::TestRequest::get()
            .uri("/registros?skip=-1")
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }
}
