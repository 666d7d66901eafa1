use crate::error::AppError;
use actix_web::http::Method;
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

// 需要管理员令牌的路径
struct AdminPaths {
    // 非 GET 请求需要认证的前缀
    write_prefixes: Vec<&'static str>,
    // 任意方法都需要认证的前缀
    guarded_prefixes: Vec<&'static str>,
    // 即使在受保护前缀下也公开的路径
    excluded_paths: Vec<&'static str>,
}

impl AdminPaths {
    fn new() -> Self {
        Self {
            write_prefixes: vec!["/promociones", "/puntos/"],
            guarded_prefixes: vec!["/admin/"],
            excluded_paths: vec!["/admin/login"],
        }
    }

    fn requires_admin(&self, method: &Method, path: &str) -> bool {
        if self.excluded_paths.contains(&path) {
            return false;
        }

        if self
            .guarded_prefixes
            .iter()
            .any(|&prefix| path.starts_with(prefix))
        {
            return true;
        }

        *method != Method::GET
            && self
                .write_prefixes
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

/// 管理员令牌校验：比对 `X-Admin-Token` 与配置的共享令牌
pub struct AdminAuthMiddleware {
    token: String,
}

impl AdminAuthMiddleware {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddlewareService {
            service,
            token: self.token.clone(),
            admin_paths: AdminPaths::new(),
        }))
    }
}

pub struct AdminAuthMiddlewareService<S> {
    service: S,
    token: String,
    admin_paths: AdminPaths,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        if !self.admin_paths.requires_admin(req.method(), req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let provided = req
            .headers()
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());

        match provided {
            Some(token) if !self.token.is_empty() && token == self.token => {
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Some(_) => {
                log::warn!("Rejected admin request with invalid token: {}", req.path());
                let error = AppError::AuthError("Invalid admin token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
            None => {
                let error = AppError::AuthError("Missing admin token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}
