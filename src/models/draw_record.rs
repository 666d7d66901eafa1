use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CustomerResponse, PromotionResponse};

/// 转盘请求，fecha_giro 由前端传入
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpinRequest {
    pub fecha_giro: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpinResponse {
    pub promocion: PromotionResponse,
    pub mensaje: String,
}

/// 抽奖记录响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrawRecordResponse {
    pub id: i32,
    pub cliente: CustomerResponse,
    /// 促销已删除时为空
    pub promocion: Option<PromotionResponse>,
    /// 中奖时的促销名称 (历史快照)
    pub promocion_nombre: String,
    pub fecha_giro: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopPromotion {
    pub nombre: String,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatisticsResponse {
    pub total_clientes: u64,
    pub total_giros: u64,
    pub promociones_top: Vec<TopPromotion>,
}
