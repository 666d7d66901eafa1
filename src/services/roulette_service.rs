use crate::entities::{
    customer_entity as customers, draw_record_entity as records,
    promotion_entity as promotions,
};
use crate::error::{AppError, AppResult};
use crate::models::{SpinResponse, StatisticsResponse, TopPromotion};
use crate::services::customer_service::find_customer;
use crate::services::draw_log_service::record_draw;
use crate::utils::{RandomSource, ThreadRandom, select_winner};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};

const TOP_PROMOTIONS: u64 = 5;

#[derive(Clone)]
pub struct RouletteService {
    pool: DatabaseConnection,
}

impl RouletteService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 转盘抽奖 (Spin)
    pub async fn spin(&self, customer_id: i32, drawn_at: DateTime<Utc>) -> AppResult<SpinResponse> {
        self.spin_with(customer_id, drawn_at, &mut ThreadRandom).await
    }

    /// 逻辑:
    /// 1. 校验客户存在
    /// 2. 读取启用的促销（按 id 升序），为空返回 NotFound
    /// 3. 按权重随机抽取，权重和 <= 0 返回 ValidationError
    /// 4. 写抽奖记录并提交
    ///
    /// 任一步失败事务回滚，不会留下记录
    pub async fn spin_with<R>(
        &self,
        customer_id: i32,
        drawn_at: DateTime<Utc>,
        source: &mut R,
    ) -> AppResult<SpinResponse>
    where
        R: RandomSource + ?Sized,
    {
        let txn = self.pool.begin().await?;

        let customer = find_customer(&txn, customer_id).await?;

        let active = promotions::Entity::find()
            .filter(promotions::Column::Active.eq(true))
            .order_by_asc(promotions::Column::Id)
            .all(&txn)
            .await?;
        if active.is_empty() {
            return Err(AppError::NotFound("No active promotions".to_string()));
        }

        let winner = select_winner(&active, source)?.clone();

        record_draw(&txn, customer.id, winner.id, drawn_at).await?;
        txn.commit().await?;

        log::info!(
            "Roulette spin: customer={} won promotion={} ({})",
            customer.id,
            winner.id,
            winner.name
        );

        let mensaje = format!(
            "¡Felicidades {}! Has ganado: {}",
            customer.full_name, winner.name
        );
        Ok(SpinResponse {
            promocion: winner.into(),
            mensaje,
        })
    }

    /// 统计：客户总数、抽奖总数、抽中次数最多的 5 个促销
    pub async fn statistics(&self) -> AppResult<StatisticsResponse> {
        let total_clientes = customers::Entity::find().count(&self.pool).await?;
        let total_giros = records::Entity::find().count(&self.pool).await?;

        #[derive(Debug, FromQueryResult)]
        struct TopRow {
            nombre: String,
            total: i64,
        }
        let top = records::Entity::find()
            .select_only()
            .column_as(promotions::Column::Name, "nombre")
            .column_as(Expr::col((records::Entity, records::Column::Id)).count(), "total")
            .join(JoinType::InnerJoin, records::Relation::Promotion.def())
            .group_by(promotions::Column::Name)
            .order_by(
                Expr::col((records::Entity, records::Column::Id)).count(),
                Order::Desc,
            )
            .limit(TOP_PROMOTIONS)
            .into_model::<TopRow>()
            .all(&self.pool)
            .await?;

        Ok(StatisticsResponse {
            total_clientes,
            total_giros,
            promociones_top: top
                .into_iter()
                .map(|r| TopPromotion {
                    nombre: r.nombre,
                    total: r.total,
                })
                .collect(),
        })
    }
}
