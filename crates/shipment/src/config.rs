//! Shipment service configuration loaded from environment variables.

use common::db::{DEFAULT_CONNECT_ATTEMPTS, DEFAULT_DATABASE_URL};
use common::env;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `HTTP_PORT`: listen port (default: `8080`)
/// - `DATABASE_URL`: PostgreSQL connection string
/// - `CUSTOMER_SERVICE_TARGET`: customer gRPC endpoint (default: `"envoy:9090"`)
/// - `DB_CONNECT_ATTEMPTS`: startup connection attempts (default: `30`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub customer_service_target: String,
    pub db_connect_attempts: u32,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::parse("HTTP_PORT").unwrap_or(defaults.port),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            customer_service_target: env::var("CUSTOMER_SERVICE_TARGET")
                .unwrap_or(defaults.customer_service_target),
            db_connect_attempts: env::parse("DB_CONNECT_ATTEMPTS")
                .unwrap_or(defaults.db_connect_attempts),
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            customer_service_target: "envoy:9090".to_string(),
            db_connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            log_level: "info".to_string(),
        }
    }
}
