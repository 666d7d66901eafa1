use crate::entities::customer_entity as customers;
use crate::error::{AppError, AppResult};
use crate::models::{CreateCustomerRequest, CustomerResponse};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

#[derive(Clone)]
pub struct CustomerService {
    pool: DatabaseConnection,
}

impl CustomerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 直接创建客户（无身份证号 / 密码，积分为 0）
    pub async fn create_customer(&self, request: CreateCustomerRequest) -> AppResult<CustomerResponse> {
        let full_name = required_trimmed(&request.nombre_completo, "nombre_completo")?;
        let semester = required_trimmed(&request.semestre, "semestre")?;
        ensure_max_chars(&full_name, "nombre_completo", MAX_NAME_CHARS)?;
        ensure_max_chars(&semester, "semestre", MAX_SEMESTER_CHARS)?;

        let model = customers::ActiveModel {
            full_name: Set(full_name),
            semester: Set(semester),
            points: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Customer created: id={}", model.id);
        Ok(model.into())
    }

    /// 客户列表（按 id 倒序）
    pub async fn list_customers(&self) -> AppResult<Vec<CustomerResponse>> {
        let list = customers::Entity::find()
            .order_by_desc(customers::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }
}

/// 按 id 查找客户，不存在返回 NotFound
pub async fn find_customer<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<customers::Model> {
    customers::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
}

pub(crate) const MAX_NAME_CHARS: usize = 255;
pub(crate) const MAX_SEMESTER_CHARS: usize = 50;

/// 长度按字符计，与 varchar(n) 一致
pub(crate) fn ensure_max_chars(value: &str, field: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::ValidationError(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub(crate) fn required_trimmed(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn request(name: &str, semester: &str) -> CreateCustomerRequest {
        CreateCustomerRequest {
            nombre_completo: name.to_string(),
            semestre: semester.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_trims_and_lists_newest_first() {
        let service = CustomerService::new(test_pool().await);

        let first = service.create_customer(request("  Ana  ", " 3 ")).await.unwrap();
        assert_eq!(first.nombre_completo, "Ana");
        assert_eq!(first.semestre, "3");
        let second = service.create_customer(request("Luis", "7")).await.unwrap();

        let list = service.list_customers().await.unwrap();
        let ids: Vec<_> = list.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let service = CustomerService::new(test_pool().await);
        let err = service.create_customer(request("   ", "3")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(service.list_customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_overlong_fields() {
        let service = CustomerService::new(test_pool().await);
        let err = service
            .create_customer(request(&"a".repeat(256), "3"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        let err = service
            .create_customer(request("Ana", &"9".repeat(51)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        // 按字符计数，多字节字符不提前拒绝
        assert!(service.create_customer(request(&"ñ".repeat(255), "3")).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_customer_not_found() {
        let pool = test_pool().await;
        let err = find_customer(&pool, 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
