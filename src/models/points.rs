use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::points_movement_entity;

/// 积分增加 / 兑换请求，按身份证号定位客户
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PointsRequest {
    #[schema(example = "1712345678")]
    pub cedula: String,
    #[schema(example = 50)]
    pub puntos: i32,
    #[serde(default)]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PointsBalanceResponse {
    pub puntos: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovementResponse {
    pub id: i32,
    pub cambio: i32,
    pub descripcion: String,
    pub created_at: DateTime<Utc>,
}

impl From<points_movement_entity::Model> for MovementResponse {
    fn from(m: points_movement_entity::Model) -> Self {
        Self {
            id: m.id,
            cambio: m.delta,
            descripcion: m.description,
            created_at: m.created_at,
        }
    }
}

/// 余额 + 最近流水 (倒序)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PointsDetailResponse {
    pub cliente_id: i32,
    pub cedula: Option<String>,
    pub puntos: i32,
    pub historial: Vec<MovementResponse>,
}
