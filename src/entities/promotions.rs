use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::utils::Weighted;

/// 轮盘促销配置
/// 概念说明:
/// - weight: 相对权重 (>= 0)，中奖概率 = weight / 所有启用促销 weight 之和
/// - active: 只有启用的促销参与抽奖
/// - color / icon: 前端轮盘展示用
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "promotions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub weight: f64,
    pub active: bool,
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Weighted for Model {
    fn weight(&self) -> f64 {
        self.weight
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::draw_records::Entity")]
    DrawRecords,
}

impl Related<super::draw_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DrawRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
