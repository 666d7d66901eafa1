use crate::config::AdminConfig;
use crate::entities::customer_entity as customers;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::customer_service::{
    MAX_NAME_CHARS, MAX_SEMESTER_CHARS, ensure_max_chars, required_trimmed,
};
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const DUPLICATE_NATIONAL_ID: &str = "National id already registered";
const MAX_NATIONAL_ID_CHARS: usize = 32;

/// 唯一索引冲突映射为 Conflict，其余保持数据库错误
fn national_id_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(DUPLICATE_NATIONAL_ID.to_string())
        }
        _ => AppError::DatabaseError(err),
    }
}

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    admin: AdminConfig,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, admin: AdminConfig) -> Self {
        Self { pool, admin }
    }

    /// 客户注册：身份证号唯一，初始积分 0
    pub async fn register(&self, request: RegisterRequest) -> AppResult<CustomerAuthResponse> {
        let national_id = required_trimmed(&request.cedula, "cedula")?;
        let full_name = required_trimmed(&request.nombre_completo, "nombre_completo")?;
        let semester = required_trimmed(&request.semestre, "semestre")?;
        ensure_max_chars(&national_id, "cedula", MAX_NATIONAL_ID_CHARS)?;
        ensure_max_chars(&full_name, "nombre_completo", MAX_NAME_CHARS)?;
        ensure_max_chars(&semester, "semestre", MAX_SEMESTER_CHARS)?;
        validate_password(&request.password)?;

        // 检查身份证号是否已注册
        let existing = customers::Entity::find()
            .filter(customers::Column::NationalId.eq(national_id.as_str()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(DUPLICATE_NATIONAL_ID.to_string()));
        }

        let password_hash = hash_password(&request.password)?;

        let model = customers::ActiveModel {
            national_id: Set(Some(national_id)),
            password_hash: Set(Some(password_hash)),
            full_name: Set(full_name),
            semester: Set(semester),
            points: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        // 并发注册时由唯一索引兜底
        .map_err(national_id_conflict)?;

        log::info!("Customer registered: id={}", model.id);
        Ok(model.into())
    }

    /// 客户登录：未知身份证号、无密码、密码错误统一返回 401
    pub async fn login(&self, request: LoginRequest) -> AppResult<CustomerAuthResponse> {
        let customer = customers::Entity::find()
            .filter(customers::Column::NationalId.eq(request.cedula.trim()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError(INVALID_CREDENTIALS.to_string()))?;

        let Some(hash) = customer.password_hash.as_deref() else {
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        };
        if !verify_password(&request.password, hash).unwrap_or(false) {
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        }

        Ok(customer.into())
    }

    /// 管理员登录，成功后返回静态管理令牌
    pub fn admin_login(&self, request: AdminLoginRequest) -> AppResult<AdminLoginResponse> {
        let username_ok = request.username.trim().to_lowercase()
            == self.admin.username.trim().to_lowercase();
        if !username_ok || !admin_password_matches(&request.password, &self.admin.password) {
            log::warn!("Admin login rejected for user {:?}", request.username);
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        }
        Ok(AdminLoginResponse {
            token: self.admin.token.clone(),
        })
    }
}
