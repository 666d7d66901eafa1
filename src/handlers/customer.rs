use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::CustomerService;

#[utoipa::path(
    post,
    path = "/clientes",
    tag = "customer",
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "创建客户成功", body = CustomerResponse),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse)
    )
)]
pub async fn create_customer(
    customer_service: web::Data<CustomerService>,
    request: web::Json<CreateCustomerRequest>,
) -> Result<HttpResponse> {
    match customer_service.create_customer(request.into_inner()).await {
        Ok(customer) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": customer
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/clientes",
    tag = "customer",
    responses(
        (status = 200, description = "客户列表", body = [CustomerResponse])
    )
)]
pub async fn list_customers(
    customer_service: web::Data<CustomerService>,
) -> Result<HttpResponse> {
    match customer_service.list_customers().await {
        Ok(customers) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": customers
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn customer_config(cfg: &mut web::ServiceConfig) {
    // /clientes/{id}/registros 与 /clientes/{id}/puntos 分别在 roulette / points 中注册
    cfg.service(
        web::resource("/clientes")
            .route(web::post().to(create_customer))
            .route(web::get().to(list_customers)),
    );
}
