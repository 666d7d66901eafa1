use crate::entities::promotion_entity as promotions;
use crate::error::{AppError, AppResult};
use crate::models::{PromotionRequest, PromotionResponse};
use crate::services::customer_service::{MAX_NAME_CHARS, ensure_max_chars};
use crate::utils::total_weight;
use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::OnceLock;

const MAX_ICON_CHARS: usize = 16;
const NON_POSITIVE_SUM: &str = "Active-weight sum must be positive";

fn color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"))
}

/// 变更后启用促销的权重和：排除正在编辑的条目，再按新值计入
pub fn projected_active_sum(
    active: &[promotions::Model],
    editing_id: Option<i32>,
    proposed_active: bool,
    proposed_weight: f64,
) -> f64 {
    let others: f64 = active
        .iter()
        .filter(|p| Some(p.id) != editing_id)
        .map(|p| p.weight)
        .sum();
    if proposed_active {
        others + proposed_weight
    } else {
        others
    }
}

#[derive(Clone)]
pub struct PromotionService {
    pool: DatabaseConnection,
}

impl PromotionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 促销列表（按 id 升序），默认只返回启用的
    pub async fn list_promotions(&self, active_only: bool) -> AppResult<Vec<PromotionResponse>> {
        let mut query = promotions::Entity::find();
        if active_only {
            query = query.filter(promotions::Column::Active.eq(true));
        }
        let list = query
            .order_by_asc(promotions::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 创建促销
    ///
    /// 在事务内锁定启用促销后校验权重和，校验与写入原子完成
    pub async fn create_promotion(&self, request: PromotionRequest) -> AppResult<PromotionResponse> {
        let request = validate_request(request)?;

        let txn = self.pool.begin().await?;
        // 未启用的促销不影响启用权重和
        if request.activa {
            let active = locked_active_promotions(&txn).await?;
            let projected = projected_active_sum(&active, None, true, request.probabilidad);
            if projected <= 0.0 {
                log::warn!("Rejected promotion create: projected active sum {projected}");
                return Err(AppError::ValidationError(NON_POSITIVE_SUM.to_string()));
            }
        }

        let model = promotions::ActiveModel {
            name: Set(request.nombre),
            description: Set(request.descripcion),
            weight: Set(request.probabilidad),
            active: Set(request.activa),
            color: Set(request.color),
            icon: Set(request.icono),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        log::info!("Promotion created: id={} name={:?}", model.id, model.name);
        Ok(model.into())
    }

    /// 更新促销（整体覆盖）
    ///
    /// active 或 weight 变化且涉及启用集合时才重新校验权重和
    pub async fn update_promotion(
        &self,
        id: i32,
        request: PromotionRequest,
    ) -> AppResult<PromotionResponse> {
        let request = validate_request(request)?;

        let txn = self.pool.begin().await?;
        let current = promotions::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Promotion not found".to_string()))?;

        let changed = request.activa != current.active || request.probabilidad != current.weight;
        if changed && (request.activa || current.active) {
            let active = locked_active_promotions(&txn).await?;
            let projected =
                projected_active_sum(&active, Some(id), request.activa, request.probabilidad);
            if projected <= 0.0 {
                log::warn!("Rejected promotion {id} update: projected active sum {projected}");
                return Err(AppError::ValidationError(NON_POSITIVE_SUM.to_string()));
            }
        }

        let mut am = current.into_active_model();
        am.name = Set(request.nombre);
        am.description = Set(request.descripcion);
        am.weight = Set(request.probabilidad);
        am.active = Set(request.activa);
        am.color = Set(request.color);
        am.icon = Set(request.icono);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await?;
        txn.commit().await?;

        log::info!("Promotion updated: id={id}");
        Ok(updated.into())
    }

    /// 删除促销，不重新校验权重和；删除后若启用权重和 <= 0 仅记录警告
    pub async fn delete_promotion(&self, id: i32) -> AppResult<()> {
        let txn = self.pool.begin().await?;
        let promo = promotions::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Promotion not found".to_string()))?;
        promo.delete(&txn).await?;

        let remaining = locked_active_promotions(&txn).await?;
        txn.commit().await?;

        let remaining_sum = total_weight(&remaining);
        if remaining_sum <= 0.0 {
            log::warn!(
                "Promotion {id} deleted; active weight sum is now {remaining_sum}, draws will fail"
            );
        } else {
            log::info!("Promotion deleted: id={id}");
        }
        Ok(())
    }
}

/// 读取启用促销并加排他锁（SQLite 忽略行锁）
async fn locked_active_promotions(
    txn: &DatabaseTransaction,
) -> Result<Vec<promotions::Model>, sea_orm::DbErr> {
    promotions::Entity::find()
        .filter(promotions::Column::Active.eq(true))
        .order_by_asc(promotions::Column::Id)
        .lock_exclusive()
        .all(txn)
        .await
}

fn validate_request(mut request: PromotionRequest) -> AppResult<PromotionRequest> {
    request.nombre = request.nombre.trim().to_string();
    if request.nombre.is_empty() {
        return Err(AppError::ValidationError("nombre must not be empty".to_string()));
    }
    ensure_max_chars(&request.nombre, "nombre", MAX_NAME_CHARS)?;
    if !request.probabilidad.is_finite() || request.probabilidad < 0.0 {
        return Err(AppError::ValidationError(
            "probabilidad must be a finite number >= 0".to_string(),
        ));
    }
    if !color_regex().is_match(&request.color) {
        return Err(AppError::ValidationError(
            "color must look like #RRGGBB".to_string(),
        ));
    }
    if request.icono.chars().count() > MAX_ICON_CHARS {
        return Err(AppError::ValidationError(format!(
            "icono must be at most {MAX_ICON_CHARS} characters"
        )));
    }
    request.descripcion = request
        .descripcion
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::models::{DEFAULT_COLOR, DEFAULT_ICON};

    fn request(name: &str, weight: f64, active: bool) -> PromotionRequest {
        PromotionRequest {
            nombre: name.to_string(),
            descripcion: None,
            probabilidad: weight,
            activa: active,
            color: DEFAULT_COLOR.to_string(),
            icono: DEFAULT_ICON.to_string(),
        }
    }

    #[tokio::test]
    async fn test_inactive_create_never_needs_positive_sum() {
        let service = PromotionService::new(test_pool().await);
        let promo = service.create_promotion(request("Off", 0.0, false)).await.unwrap();
        assert!(!promo.activa);
        assert!(service.list_promotions(true).await.unwrap().is_empty());
        assert_eq!(service.list_promotions(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_active_zero_weight_alone_is_rejected() {
        let service = PromotionService::new(test_pool().await);
        let err = service
            .create_promotion(request("Nada", 0.0, true))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(service.list_promotions(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_active_zero_weight_with_other_active_is_allowed() {
        let service = PromotionService::new(test_pool().await);
        service.create_promotion(request("Café", 10.0, true)).await.unwrap();
        service.create_promotion(request("Nada", 0.0, true)).await.unwrap();
        assert_eq!(service.list_promotions(true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_that_zeroes_active_sum_is_rejected() {
        let service = PromotionService::new(test_pool().await);
        let only = service.create_promotion(request("Café", 10.0, true)).await.unwrap();

        let err = service
            .update_promotion(only.id, request("Café", 10.0, false))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = service
            .update_promotion(only.id, request("Café", 0.0, true))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        // 未发生任何变更
        let list = service.list_promotions(true).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].probabilidad, 10.0);
    }

    #[tokio::test]
    async fn test_update_excludes_old_values_of_edited_promotion() {
        let service = PromotionService::new(test_pool().await);
        let a = service.create_promotion(request("A", 10.0, true)).await.unwrap();
        let b = service.create_promotion(request("B", 5.0, true)).await.unwrap();

        // A 停用后仍有 B 保持权重和为正
        let updated = service
            .update_promotion(a.id, request("A2", 3.0, false))
            .await
            .unwrap();
        assert_eq!(updated.nombre, "A2");
        assert!(!updated.activa);

        // 此时 B 是唯一启用的，不能再停用
        let err = service
            .update_promotion(b.id, request("B", 5.0, false))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_without_weight_change_skips_check() {
        let service = PromotionService::new(test_pool().await);
        let off = service.create_promotion(request("Off", 0.0, false)).await.unwrap();
        let renamed = service
            .update_promotion(off.id, request("Still off", 0.0, false))
            .await
            .unwrap();
        assert_eq!(renamed.nombre, "Still off");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_promotion() {
        let service = PromotionService::new(test_pool().await);
        assert!(matches!(
            service.update_promotion(99, request("X", 1.0, true)).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_promotion(99).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_last_active_is_allowed() {
        let service = PromotionService::new(test_pool().await);
        let only = service.create_promotion(request("Café", 10.0, true)).await.unwrap();
        service.delete_promotion(only.id).await.unwrap();
        assert!(service.list_promotions(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_validation() {
        let service = PromotionService::new(test_pool().await);
        let mut bad_color = request("X", 1.0, true);
        bad_color.color = "red".to_string();
        assert!(matches!(
            service.create_promotion(bad_color).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.create_promotion(request("X", -1.0, true)).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.create_promotion(request("X", f64::NAN, true)).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.create_promotion(request("   ", 1.0, true)).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.create_promotion(request(&"p".repeat(256), 1.0, true)).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_projected_active_sum() {
        let now = Utc::now();
        let model = |id, weight| promotions::Model {
            id,
            name: format!("p{id}"),
            description: None,
            weight,
            active: true,
            color: DEFAULT_COLOR.to_string(),
            icon: DEFAULT_ICON.to_string(),
            created_at: now,
            updated_at: None,
        };
        let active = vec![model(1, 10.0), model(2, 20.0)];
        assert_eq!(projected_active_sum(&active, None, true, 5.0), 35.0);
        assert_eq!(projected_active_sum(&active, None, false, 5.0), 30.0);
        assert_eq!(projected_active_sum(&active, Some(1), true, 1.0), 21.0);
        assert_eq!(projected_active_sum(&active, Some(2), false, 0.0), 10.0);
    }
}
