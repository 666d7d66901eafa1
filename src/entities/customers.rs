use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 客户
/// - national_id: 身份证号 (cédula)，注册用户才有，唯一
/// - password_hash: bcrypt 哈希，通过管理端/公开接口直接创建的客户为 NULL
/// - points: 积分余额缓存，必须等于 points_movements 中该客户 delta 之和
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub national_id: Option<String>,
    pub full_name: String,
    pub semester: String,
    pub password_hash: Option<String>,
    pub points: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::draw_records::Entity")]
    DrawRecords,
    #[sea_orm(has_many = "super::points_movements::Entity")]
    PointsMovements,
}

impl Related<super::draw_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DrawRecords.def()
    }
}

impl Related<super::points_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PointsMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
