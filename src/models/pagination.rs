//! 分页相关的数据结构 (skip / limit 形式)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct SkipLimitQuery {
    /// 跳过的条数 (默认 0)
    pub skip: Option<u64>,
    /// 返回条数上限 (会被限制在 1..=max)
    pub limit: Option<u64>,
}

impl SkipLimitQuery {
    pub fn get_offset(&self) -> u64 {
        self.skip.unwrap_or(0)
    }
}

/// 把 limit 限制在 `1..=max`
pub fn clamp_limit(limit: u64, max: u64) -> u64 {
    limit.clamp(1, max.max(1))
}
