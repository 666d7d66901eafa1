use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::middlewares::ADMIN_TOKEN_HEADER;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_TOKEN_HEADER))),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::register,
        handlers::auth::login,
        handlers::customer::create_customer,
        handlers::customer::list_customers,
        handlers::promotion::list_promotions,
        handlers::promotion::create_promotion,
        handlers::promotion::update_promotion,
        handlers::promotion::delete_promotion,
        handlers::roulette::spin,
        handlers::roulette::statistics,
        handlers::roulette::list_draws,
        handlers::roulette::list_customer_draws,
        handlers::points::add_points,
        handlers::points::redeem_points,
        handlers::points::get_points,
        handlers::admin::admin_login,
        handlers::admin::ping,
    ),
    components(
        schemas(
            HealthResponse,
            ApiError,
            ApiErrorResponse,
            CreateCustomerRequest,
            CustomerResponse,
            RegisterRequest,
            LoginRequest,
            CustomerAuthResponse,
            AdminLoginRequest,
            AdminLoginResponse,
            PromotionRequest,
            PromotionResponse,
            PromotionListQuery,
            SpinRequest,
            SpinResponse,
            DrawRecordResponse,
            TopPromotion,
            StatisticsResponse,
            SkipLimitQuery,
            PointsRequest,
            PointsBalanceResponse,
            MovementResponse,
            PointsDetailResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check"),
        (name = "auth", description = "Customer registration and login"),
        (name = "customer", description = "Customer directory"),
        (name = "promotion", description = "Promotion registry"),
        (name = "roulette", description = "Roulette draws, history and statistics"),
        (name = "points", description = "Points ledger"),
        (name = "admin", description = "Admin gate"),
    ),
    info(
        title = "Caturro Café API",
        version = "1.0.0",
        description = "Caturro Café loyalty roulette REST API"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_admin_scheme_and_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/ruleta/{cliente_id}"));
        assert!(doc.paths.paths.contains_key("/clientes/{id}/puntos"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("admin_token"));
    }
}
