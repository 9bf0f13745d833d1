//! User service configuration.

use std::env;

use common::{DatabaseConfig, LogConfig, LogFormat, ServiceConfig};

/// Which store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl From<&str> for StorageBackend {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => StorageBackend::Memory,
            _ => StorageBackend::Postgres,
        }
    }
}

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub storage: StorageBackend,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let service_defaults = ServiceConfig::default();
        let db_defaults = DatabaseConfig::default();
        let log_defaults = LogConfig::default();

        Self {
            service: ServiceConfig {
                service_name: service_defaults.service_name,
                host: env::var("USER_SERVICE_HOST").unwrap_or(service_defaults.host),
                port: env_parse("USER_SERVICE_PORT", service_defaults.port),
                request_timeout_secs: env_parse(
                    "REQUEST_TIMEOUT_SECS",
                    service_defaults.request_timeout_secs,
                ),
            },
            database: DatabaseConfig {
                url: env::var("USER_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(db_defaults.url),
                max_connections: env_parse("DB_MAX_CONNECTIONS", db_defaults.max_connections),
                min_connections: env_parse("DB_MIN_CONNECTIONS", db_defaults.min_connections),
                connect_timeout_secs: env_parse(
                    "DB_CONNECT_TIMEOUT_SECS",
                    db_defaults.connect_timeout_secs,
                ),
                acquire_timeout_secs: env_parse(
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    db_defaults.acquire_timeout_secs,
                ),
                idle_timeout_secs: env_parse("DB_IDLE_TIMEOUT_SECS", db_defaults.idle_timeout_secs),
                max_lifetime_secs: env_parse("DB_MAX_LIFETIME_SECS", db_defaults.max_lifetime_secs),
            },
            log: LogConfig {
                level: env::var("LOG_LEVEL").unwrap_or(log_defaults.level),
                format: env::var("LOG_FORMAT")
                    .map(|f| LogFormat::from(f.as_str()))
                    .unwrap_or(log_defaults.format),
            },
            storage: env::var("USER_SERVICE_STORAGE")
                .map(|s| StorageBackend::from(s.as_str()))
                .unwrap_or(StorageBackend::Postgres),
        }
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            database: DatabaseConfig::default(),
            log: LogConfig::default(),
            storage: StorageBackend::Postgres,
        }
    }
}
