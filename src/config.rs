use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};

use crate::external::data_source::DataSourceError;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full `mysql://` URL; takes precedence over the individual fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()),
            host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3306),
            user: std::env::var("DB_USER").unwrap_or_else(|_| "root".to_string()),
            password: std::env::var("DB_PASSWORD").unwrap_or_default(),
            database: std::env::var("DB_NAME").unwrap_or_else(|_| "crypto_analysis".to_string()),
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(5),
            acquire_timeout: Duration::from_secs(
                std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("DB_MAX_CONNECTIONS must be greater than zero".to_string());
        }
        if self.url.is_none() && self.database.trim().is_empty() {
            return Err("DB_NAME must not be empty".to_string());
        }
        Ok(())
    }

    pub fn connect_options(&self) -> Result<MySqlConnectOptions, DataSourceError> {
        match &self.url {
            Some(url) => MySqlConnectOptions::from_str(url)
                .map_err(|e| DataSourceError::Connection(format!("invalid DATABASE_URL: {}", e))),
            None => Ok(MySqlConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.database)),
        }
    }

    pub fn pool_options(&self) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let raw = std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let addr = raw
            .parse()
            .map_err(|e| format!("invalid SERVER_ADDR '{}': {}", raw, e))?;
        Ok(Self { addr })
    }
}
