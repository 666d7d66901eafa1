use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::customer_entity;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    #[schema(example = "Ana Pérez")]
    pub nombre_completo: String,
    #[schema(example = "5")]
    pub semestre: String,
}

/// 客户公开信息
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub nombre_completo: String,
    pub semestre: String,
}

impl From<customer_entity::Model> for CustomerResponse {
    fn from(m: customer_entity::Model) -> Self {
        Self {
            id: m.id,
            nombre_completo: m.full_name,
            semestre: m.semester,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "1712345678")]
    pub cedula: String,
    #[schema(example = "secreto")]
    pub password: String,
    #[schema(example = "Ana Pérez")]
    pub nombre_completo: String,
    #[schema(example = "5")]
    pub semestre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "1712345678")]
    pub cedula: String,
    #[schema(example = "secreto")]
    pub password: String,
}

/// 注册 / 登录返回的客户资料
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerAuthResponse {
    pub id: i32,
    pub cedula: String,
    pub nombre_completo: String,
    pub puntos: i32,
}

impl From<customer_entity::Model> for CustomerAuthResponse {
    fn from(m: customer_entity::Model) -> Self {
        Self {
            id: m.id,
            cedula: m.national_id.unwrap_or_default(),
            nombre_completo: m.full_name,
            puntos: m.points,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginResponse {
    pub token: String,
}
