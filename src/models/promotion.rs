use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::promotion_entity;

pub const DEFAULT_WEIGHT: f64 = 10.0;
pub const DEFAULT_COLOR: &str = "#4B5563";
pub const DEFAULT_ICON: &str = "🎁";

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

fn default_active() -> bool {
    true
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// 创建 / 更新促销（更新为整体覆盖）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromotionRequest {
    #[schema(example = "Café gratis")]
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    /// 相对权重 (>= 0)
    #[serde(default = "default_weight")]
    #[schema(example = 10.0)]
    pub probabilidad: f64,
    #[serde(default = "default_active")]
    pub activa: bool,
    #[serde(default = "default_color")]
    #[schema(example = "#4B5563")]
    pub color: String,
    #[serde(default = "default_icon")]
    #[schema(example = "🎁")]
    pub icono: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromotionResponse {
    pub id: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub probabilidad: f64,
    pub activa: bool,
    pub color: String,
    pub icono: String,
}

impl From<promotion_entity::Model> for PromotionResponse {
    fn from(m: promotion_entity::Model) -> Self {
        Self {
            id: m.id,
            nombre: m.name,
            descripcion: m.description,
            probabilidad: m.weight,
            activa: m.active,
            color: m.color,
            icono: m.icon,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PromotionListQuery {
    /// 只返回启用的促销 (默认 true)
    pub activas_solo: Option<bool>,
}
