//! Customer service configuration loaded from environment variables.

use common::db::{DEFAULT_CONNECT_ATTEMPTS, DEFAULT_DATABASE_URL};
use common::env;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `GRPC_PORT`: gRPC listen port (default: `9090`)
/// - `METRICS_PORT`: Prometheus scrape port (default: `9464`)
/// - `DATABASE_URL`: PostgreSQL connection string
/// - `DB_CONNECT_ATTEMPTS`: startup connection attempts (default: `30`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub grpc_port: u16,
    pub metrics_port: u16,
    pub database_url: String,
    pub db_connect_attempts: u32,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            grpc_port: env::parse("GRPC_PORT").unwrap_or(defaults.grpc_port),
            metrics_port: env::parse("METRICS_PORT").unwrap_or(defaults.metrics_port),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_connect_attempts: env::parse("DB_CONNECT_ATTEMPTS")
                .unwrap_or(defaults.db_connect_attempts),
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Returns the `"host:port"` gRPC bind address string.
    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.host, self.grpc_port)
    }

    /// Returns the `"host:port"` metrics bind address string.
    pub fn metrics_addr(&self) -> String {
        format!("{}:{}", self.host, self.metrics_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            grpc_port: 9090,
            metrics_port: 9464,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            log_level: "info".to_string(),
        }
    }
}
