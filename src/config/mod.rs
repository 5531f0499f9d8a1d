use crate::core::{AppError, Currency, Result};
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// `json` switches the log output to JSON lines
    pub log_format: String,
    pub client_cache_ttl_secs: i64,
    pub recent_invoice_limit: u32,
    pub default_currency: Currency,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            client_cache_ttl_secs: env::var("CLIENT_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| AppError::Configuration("Invalid CLIENT_CACHE_TTL_SECS".to_string()))?,
            recent_invoice_limit: env::var("RECENT_INVOICE_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| AppError::Configuration("Invalid RECENT_INVOICE_LIMIT".to_string()))?,
            default_currency: env::var("DEFAULT_CURRENCY")
                .unwrap_or_else(|_| "INR".to_string())
                .parse()
                .map_err(|_| AppError::Configuration("Invalid DEFAULT_CURRENCY".to_string()))?,
        })
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.client_cache_ttl_secs < 0 {
            return Err(AppError::Configuration(
                "Client cache TTL cannot be negative".to_string(),
            ));
        }

        if self.app.recent_invoice_limit == 0 {
            return Err(AppError::Configuration(
                "Recent invoice limit must be greater than 0".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "Server workers must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
