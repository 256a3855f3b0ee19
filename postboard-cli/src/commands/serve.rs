//! HTTP server command
//!
//! Runs the postboard API against Postgres, or against process memory
//! with `--memory`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use postboard_server::db::{MemoryStore, PoolSettings, StoreAccessor, DEFAULT_MAX_CONNECTIONS};
use postboard_server::{run_server, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "POSTBOARD_BIND", default_value = "127.0.0.1:8787")]
    pub bind: SocketAddr,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Seconds to wait for a free database connection
    #[arg(long, default_value_t = 5)]
    pub acquire_timeout: u64,

    /// Include underlying error text in 500 responses (debugging only)
    #[arg(long, env = "POSTBOARD_EXPOSE_ERROR_DETAILS")]
    pub expose_error_details: bool,

    /// Keep data in memory instead of Postgres (lost on shutdown).
    /// Takes precedence over --database-url.
    #[arg(long)]
    pub memory: bool,

    /// Do not create tables on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            // Blank counts as unset, same as the store accessor
            database_url: self
                .database_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
            pool: PoolSettings {
                max_connections: self.max_connections,
                acquire_timeout: Duration::from_secs(self.acquire_timeout),
            },
            expose_error_details: self.expose_error_details,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config();

    let accessor = if args.memory {
        tracing::warn!("Using in-memory store - data is lost on shutdown");
        StoreAccessor::preloaded(Arc::new(MemoryStore::new()))
    } else {
        let accessor = StoreAccessor::new(config.pool);
        match config.database_url.as_deref() {
            None => tracing::warn!(
                "DATABASE_URL not set - user and post routes will answer 500 until it is configured"
            ),
            Some(url) if !args.skip_migrations => {
                let store = accessor
                    .get_client(Some(url))
                    .context("Failed to configure database client")?;
                store
                    .migrate()
                    .await
                    .context("Failed to run migrations")?;
            }
            Some(_) => tracing::info!("Skipping migrations"),
        }
        accessor
    };

    let state = AppState::new(
        accessor,
        config.database_url.clone(),
        config.expose_error_details,
    );

    tracing::info!("Starting postboard server on {}", config.bind_addr);
    run_server(state, config.bind_addr)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServeArgs {
        ServeArgs::try_parse_from(std::iter::once("serve").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn blank_database_url_is_unset() {
        let config = parse(&["--database-url", "   "]).server_config();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn database_url_is_kept_verbatim() {
        let config = parse(&["--database-url", "postgres://localhost/postboard"]).server_config();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/postboard")
        );
    }

    #[test]
    fn pool_flags_reach_config() {
        let config = parse(&[
            "--database-url",
            "postgres://localhost/postboard",
            "--max-connections",
            "9",
            "--acquire-timeout",
            "2",
        ])
        .server_config();
        assert_eq!(config.pool.max_connections, 9);
        assert_eq!(config.pool.acquire_timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn blank_database_url_does_not_abort_startup() {
        // Port 0 binds anywhere; the server keeps running until the timeout fires
        let args = parse(&["--database-url", "  ", "--bind", "127.0.0.1:0"]);
        let outcome = tokio::time::timeout(Duration::from_millis(300), run_serve(args)).await;
        assert!(outcome.is_err(), "serve exited early: {:?}", outcome);
    }
}
