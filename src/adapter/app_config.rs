use crate::adapter::database_config::{env_or, parse_env, ConfigError};
use std::net::SocketAddr;

/// 予約データの保存先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// MySQL（既定）
    MySql,
    /// プロセス内メモリ（サンプル客室を投入したデモ用）
    Memory,
}

impl StorageBackend {
    pub fn from_string(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::MySql),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::InvalidValue(format!(
                "Invalid STORAGE_BACKEND: {} (expected mysql or memory)",
                other
            ))),
        }
    }
}

/// サーバー全体の設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
}

impl AppConfig {
    /// 環境変数から設定を読み取る
    /// APP_HOST（既定 0.0.0.0）, APP_PORT（既定 3000）, STORAGE_BACKEND（既定 mysql）
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or("APP_HOST", "0.0.0.0"),
            port: parse_env("APP_PORT", "3000")?,
            storage: StorageBackend::from_string(&env_or("STORAGE_BACKEND", "mysql"))?,
        })
    }

    /// 待ち受けアドレス
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid APP_HOST: {}", e)))
    }
}
