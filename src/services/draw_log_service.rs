use crate::entities::{
    customer_entity as customers, draw_record_entity as records,
    promotion_entity as promotions,
};
use crate::error::{AppError, AppResult};
use crate::models::{DrawRecordResponse, clamp_limit};
use crate::services::customer_service::find_customer;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct DrawLogService {
    pool: DatabaseConnection,
    max_limit: u64,
}

impl DrawLogService {
    pub fn new(pool: DatabaseConnection, max_limit: u64) -> Self {
        Self { pool, max_limit }
    }

    /// 抽奖记录（倒序），limit 限制在 1..=max_limit
    ///
    /// 指定客户时客户必须存在
    pub async fn list_draws(
        &self,
        skip: u64,
        limit: u64,
        customer_id: Option<i32>,
    ) -> AppResult<Vec<DrawRecordResponse>> {
        let limit = clamp_limit(limit, self.max_limit);

        let mut query = records::Entity::find();
        if let Some(customer_id) = customer_id {
            find_customer(&self.pool, customer_id).await?;
            query = query.filter(records::Column::CustomerId.eq(customer_id));
        }

        let page = query
            .order_by_desc(records::Column::DrawnAt)
            .order_by_desc(records::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.pool)
            .await?;

        self.attach_relations(page).await
    }

    /// 批量加载记录关联的客户与促销
    async fn attach_relations(
        &self,
        page: Vec<records::Model>,
    ) -> AppResult<Vec<DrawRecordResponse>> {
        if page.is_empty() {
            return Ok(Vec::new());
        }

        let customer_ids: Vec<i32> = page.iter().map(|r| r.customer_id).collect();
        let promotion_ids: Vec<i32> = page.iter().filter_map(|r| r.promotion_id).collect();

        let customers_by_id: HashMap<i32, customers::Model> = customers::Entity::find()
            .filter(customers::Column::Id.is_in(customer_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let promotions_by_id: HashMap<i32, promotions::Model> = if promotion_ids.is_empty() {
            HashMap::new()
        } else {
            promotions::Entity::find()
                .filter(promotions::Column::Id.is_in(promotion_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect()
        };

        page.into_iter()
            .map(|record| {
                let customer = customers_by_id.get(&record.customer_id).cloned().ok_or_else(|| {
                    AppError::InternalError(format!(
                        "Draw record {} references missing customer {}",
                        record.id, record.customer_id
                    ))
                })?;
                let promotion = record
                    .promotion_id
                    .and_then(|id| promotions_by_id.get(&id).cloned());
                Ok(DrawRecordResponse {
                    id: record.id,
                    cliente: customer.into(),
                    promocion: promotion.map(Into::into),
                    promocion_nombre: record.promotion_name,
                    fecha_giro: record.drawn_at,
                })
            })
            .collect()
    }
}

/// 追加一条抽奖记录；客户或促销不存在时返回 NotFound。
/// 接受任意连接，抽奖流程在自己的事务内调用。
pub async fn record_draw<C: ConnectionTrait>(
    conn: &C,
    customer_id: i32,
    promotion_id: i32,
    drawn_at: DateTime<Utc>,
) -> AppResult<records::Model> {
    find_customer(conn, customer_id).await?;
    let promotion = promotions::Entity::find_by_id(promotion_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Promotion not found".to_string()))?;

    let record = records::ActiveModel {
        customer_id: Set(customer_id),
        promotion_id: Set(Some(promotion.id)),
        promotion_name: Set(promotion.name),
        drawn_at: Set(drawn_at),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(record)
}
