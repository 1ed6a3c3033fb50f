//! 应用运行配置加载。

use std::env;

/// 默认监听地址。
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";

/// 默认数据库最大连接数。
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: String,
    pub database_max_connections: u32,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = read_required("AVCONF_DATABASE_URL")?;
        let http_addr =
            env::var("AVCONF_HTTP_ADDR").unwrap_or_else(|_| DEFAULT_HTTP_ADDR.to_string());
        let database_max_connections =
            read_u32_with_default("AVCONF_DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid(
                "AVCONF_DB_MAX_CONNECTIONS".to_string(),
                "0".to_string(),
            ));
        }

        Ok(Self {
            http_addr,
            database_url,
            database_max_connections,
        })
    }
}

/// 读取必填环境变量，空字符串视为缺失。
fn read_required(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key.to_string())),
    }
}

fn read_u32_with_default(key: &str, default: u32) -> Result<u32, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}
