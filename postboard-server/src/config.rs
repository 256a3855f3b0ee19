//! Server configuration

use std::net::SocketAddr;

use crate::db::PoolSettings;

/// Environment key holding the Postgres connection string
pub const DATABASE_URL_KEY: &str = "DATABASE_URL";

/// The store cannot be reached because configuration is missing or bad
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not configured")]
    Missing { key: &'static str },

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8787)
    pub bind_addr: SocketAddr,

    /// Postgres connection string; `None` leaves store routes answering 500
    pub database_url: Option<String>,

    /// Connection pool sizing
    pub pool: PoolSettings,

    /// Include the underlying error text in 500 responses.
    ///
    /// Off by default. Only for local debugging.
    pub expose_error_details: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            database_url: None,
            pool: PoolSettings::default(),
            expose_error_details: false,
        }
    }
}
