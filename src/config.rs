use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// 管理端共享密钥
/// - token: 所有管理接口通过 `X-Admin-Token` 头比对
/// - password: 明文，或以 `$2` 开头的 bcrypt 哈希
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub token: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 允许的来源，`*` 表示全部
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { max_limit: 100 }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::from_toml_str(&config_str)
                .with_context(|| format!("Failed to parse config file {config_path}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env_defaults()?,
            Err(e) => {
                return Err(e).with_context(|| format!("Cannot read config file {config_path}"));
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn from_env_defaults() -> anyhow::Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// 无配置文件时由变量构建；DATABASE_URL 与 ADMIN_TOKEN 必须提供
    fn from_vars(get_env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = get_env("DATABASE_URL").ok_or_else(|| {
            anyhow!("DATABASE_URL is not set and no config.toml was found")
        })?;
        let admin_token = get_env("ADMIN_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("ADMIN_TOKEN is not set and no config.toml was found"))?;

        Ok(Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env("SERVER_PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(8000),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: get_env("DB_MAX_CONNECTIONS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            },
            admin: AdminConfig {
                token: admin_token,
                username: get_env("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
                password: get_env("ADMIN_PASSWORD").unwrap_or_default(),
            },
            cors: get_env("CORS_ORIGINS")
                .map(|v| CorsConfig {
                    origins: split_origins(&v),
                })
                .unwrap_or_default(),
            pagination: PaginationConfig {
                max_limit: get_env("PAGINATION_MAX_LIMIT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(100),
            },
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("ADMIN_TOKEN") {
            self.admin.token = v;
        }
        if let Ok(v) = env::var("ADMIN_USERNAME") {
            self.admin.username = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.admin.password = v;
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.cors.origins = split_origins(&v);
        }
        if let Ok(v) = env::var("PAGINATION_MAX_LIMIT")
            && let Ok(n) = v.parse()
        {
            self.pagination.max_limit = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_minimal_toml_uses_defaults() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 8000

            [database]
            url = "sqlite::memory:"
            max_connections = 1

            [admin]
            token = "tok"
            username = "admin"
            password = "secret"
        "#;
        let config = Config::from_toml_str(raw).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.admin.token, "tok");
        assert_eq!(config.pagination.max_limit, 100);
        assert_eq!(config.cors.origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_parse_rejects_missing_admin_section() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 8000

            [database]
            url = "sqlite::memory:"
            max_connections = 1
        "#;
        assert!(Config::from_toml_str(raw).is_err());
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_config_requires_admin_token() {
        let err = Config::from_vars(vars(&[("DATABASE_URL", "sqlite::memory:")])).unwrap_err();
        assert!(err.to_string().contains("ADMIN_TOKEN"));

        let blank = vars(&[("DATABASE_URL", "sqlite::memory:"), ("ADMIN_TOKEN", "  ")]);
        assert!(Config::from_vars(blank).is_err());

        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("ADMIN_TOKEN", "tok"),
            ("PAGINATION_MAX_LIMIT", "25"),
        ]))
        .unwrap();
        assert_eq!(config.admin.token, "tok");
        assert_eq!(config.admin.username, "admin");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.pagination.max_limit, 25);
    }

    #[test]
    fn test_env_config_requires_database_url() {
        let err = Config::from_vars(vars(&[("ADMIN_TOKEN", "tok")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_split_origins() {
        assert_eq!(
            split_origins(" http://a.com, ,http://b.com "),
            vec!["http://a.com", "http://b.com"]
        );
    }
}
