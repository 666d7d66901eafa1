use bcrypt::{hash, verify, DEFAULT_COST};
use crate::error::{AppError, AppResult};

/// bcrypt 只使用前 72 字节
const MAX_PASSWORD_BYTES: usize = 72;

/// 校验密码：非空且不超过 bcrypt 可处理的长度
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::ValidationError(
            "Password must not be empty".to_string(),
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::ValidationError(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

/// 对密码进行哈希
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))
}

/// 验证密码
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    verify(password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))
}

/// 管理员密码可以是明文或 bcrypt 哈希（以 `$2` 开头）。
/// 哈希格式损坏或未配置密码视为不匹配。
pub fn admin_password_matches(password: &str, stored: &str) -> bool {
    if stored.is_empty() {
        return false;
    }
    if stored.starts_with("$2") {
        return verify(password, stored).unwrap_or(false);
    }
    password == stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secreto").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(73)).is_err());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "Password123";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("WrongPassword", &hashed).unwrap());
    }

    #[test]
    fn test_admin_password_plain_and_hashed() {
        assert!(admin_password_matches("admin123", "admin123"));
        assert!(!admin_password_matches("admin124", "admin123"));

        let hashed = bcrypt::hash("admin123", 4).unwrap();
        assert!(admin_password_matches("admin123", &hashed));
        assert!(!admin_password_matches("admin124", &hashed));

        assert!(!admin_password_matches("", ""));

        // 损坏的哈希不会 panic
        assert!(!admin_password_matches("admin123", "$2b$broken"));
    }
}
