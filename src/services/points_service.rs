use crate::entities::{customer_entity as customers, points_movement_entity as movements};
use crate::error::{AppError, AppResult};
use crate::models::{PointsDetailResponse, PointsRequest};
use crate::services::customer_service::{ensure_max_chars, find_customer};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, UpdateResult,
};

/// 余额查询默认返回的流水条数
pub const HISTORY_LIMIT: u64 = 50;

const MAX_DESCRIPTION_CHARS: usize = 255;

/// 积分账本
///
/// customers.points 是流水之和的缓存，增量维护。
/// 流水写入与余额更新在同一事务内提交，任一失败都整体回滚。
#[derive(Clone)]
pub struct PointsService {
    pool: DatabaseConnection,
}

impl PointsService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 增加积分，返回新余额
    pub async fn add_points(&self, customer_id: i32, amount: i32, description: &str) -> AppResult<i32> {
        ensure_positive(amount, "Points to add must be > 0")?;
        ensure_description(description)?;
        let txn = self.pool.begin().await?;
        let customer = find_customer(&txn, customer_id).await?;
        let balance = credit(&txn, &customer, amount, description).await?;
        txn.commit().await?;
        Ok(balance)
    }

    /// 兑换积分，余额不足返回 InsufficientBalance 且余额不变
    pub async fn redeem_points(
        &self,
        customer_id: i32,
        amount: i32,
        description: &str,
    ) -> AppResult<i32> {
        ensure_positive(amount, "Points to redeem must be > 0")?;
        ensure_description(description)?;
        let txn = self.pool.begin().await?;
        let customer = find_customer(&txn, customer_id).await?;
        let balance = debit(&txn, &customer, amount, description).await?;
        txn.commit().await?;
        Ok(balance)
    }

    /// 按身份证号增加积分（管理端接口）
    pub async fn add_points_by_national_id(&self, request: PointsRequest) -> AppResult<i32> {
        ensure_positive(request.puntos, "Points to add must be > 0")?;
        let description = request.descripcion.unwrap_or_default();
        ensure_description(&description)?;
        let txn = self.pool.begin().await?;
        let customer = find_by_national_id(&txn, &request.cedula).await?;
        let balance = credit(&txn, &customer, request.puntos, &description).await?;
        txn.commit().await?;
        Ok(balance)
    }

    /// 按身份证号兑换积分（管理端接口）
    pub async fn redeem_points_by_national_id(&self, request: PointsRequest) -> AppResult<i32> {
        ensure_positive(request.puntos, "Points to redeem must be > 0")?;
        let description = request.descripcion.unwrap_or_default();
        ensure_description(&description)?;
        let txn = self.pool.begin().await?;
        let customer = find_by_national_id(&txn, &request.cedula).await?;
        let balance = debit(&txn, &customer, request.puntos, &description).await?;
        txn.commit().await?;
        Ok(balance)
    }

    /// 余额 + 最近 limit 条流水（倒序）
    pub async fn get_balance_and_history(
        &self,
        customer_id: i32,
        limit: u64,
    ) -> AppResult<PointsDetailResponse> {
        let customer = find_customer(&self.pool, customer_id).await?;
        let history = movements::Entity::find()
            .filter(movements::Column::CustomerId.eq(customer_id))
            .order_by_desc(movements::Column::CreatedAt)
            .order_by_desc(movements::Column::Id)
            .limit(limit)
            .all(&self.pool)
            .await?;

        Ok(PointsDetailResponse {
            cliente_id: customer.id,
            cedula: customer.national_id,
            puntos: customer.points,
            historial: history.into_iter().map(Into::into).collect(),
        })
    }
}

fn ensure_positive(amount: i32, message: &str) -> AppResult<()> {
    if amount <= 0 {
        return Err(AppError::ValidationError(message.to_string()));
    }
    Ok(())
}

fn ensure_description(description: &str) -> AppResult<()> {
    ensure_max_chars(description.trim(), "descripcion", MAX_DESCRIPTION_CHARS)
}

async fn find_by_national_id(
    txn: &DatabaseTransaction,
    national_id: &str,
) -> AppResult<customers::Model> {
    customers::Entity::find()
        .filter(customers::Column::NationalId.eq(national_id.trim()))
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
}

async fn credit(
    txn: &DatabaseTransaction,
    customer: &customers::Model,
    amount: i32,
    description: &str,
) -> AppResult<i32> {
    // 余额上限为 i32::MAX (where points <= i32::MAX - amount)
    let update_result: UpdateResult = customers::Entity::update_many()
        .col_expr(
            customers::Column::Points,
            Expr::col(customers::Column::Points).add(amount),
        )
        .col_expr(customers::Column::UpdatedAt, Expr::value(Some(Utc::now())))
        .filter(customers::Column::Id.eq(customer.id))
        .filter(customers::Column::Points.lte(i32::MAX - amount))
        .exec(txn)
        .await?;

    if update_result.rows_affected != 1 {
        return Err(AppError::ValidationError(format!(
            "Balance would exceed {}: balance {}, requested {amount}",
            i32::MAX,
            customer.points
        )));
    }

    append_movement(txn, customer.id, amount, description).await?;
    let balance = current_balance(txn, customer.id).await?;
    log::info!("Points added: customer={} +{amount} balance={balance}", customer.id);
    Ok(balance)
}

async fn debit(
    txn: &DatabaseTransaction,
    customer: &customers::Model,
    amount: i32,
    description: &str,
) -> AppResult<i32> {
    // 条件扣减：只有余额足够时才更新 (where points >= amount)
    let update_result: UpdateResult = customers::Entity::update_many()
        .col_expr(
            customers::Column::Points,
            Expr::col(customers::Column::Points).sub(amount),
        )
        .col_expr(customers::Column::UpdatedAt, Expr::value(Some(Utc::now())))
        .filter(customers::Column::Id.eq(customer.id))
        .filter(customers::Column::Points.gte(amount))
        .exec(txn)
        .await?;

    if update_result.rows_affected != 1 {
        return Err(AppError::InsufficientBalance(format!(
            "Not enough points: balance {}, requested {amount}",
            customer.points
        )));
    }

    append_movement(txn, customer.id, -amount, description).await?;
    let balance = current_balance(txn, customer.id).await?;
    log::info!("Points redeemed: customer={} -{amount} balance={balance}", customer.id);
    Ok(balance)
}

async fn append_movement(
    txn: &DatabaseTransaction,
    customer_id: i32,
    delta: i32,
    description: &str,
) -> AppResult<movements::Model> {
    let movement = movements::ActiveModel {
        customer_id: Set(customer_id),
        delta: Set(delta),
        description: Set(description.trim().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok(movement)
}

async fn current_balance(txn: &DatabaseTransaction, customer_id: i32) -> AppResult<i32> {
    let customer = find_customer(txn, customer_id).await?;
    Ok(customer.points)
}
