//! Store client accessor
//!
//! Builds the store handle once and hands out clones of it afterwards.
//! The accessor itself is created at startup and injected through
//! `AppState`, so there is no process-global client.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::pool::PoolSettings;
use super::store::{PgStore, Store};
use crate::config::{ConfigError, DATABASE_URL_KEY};

/// Memoizes one store handle for the accessor's lifetime
pub struct StoreAccessor {
    settings: PoolSettings,
    cell: OnceCell<Arc<dyn Store>>,
}

impl StoreAccessor {
    /// Accessor that builds a [`PgStore`] on the first successful call.
    pub fn new(settings: PoolSettings) -> Self {
        Self {
            settings,
            cell: OnceCell::new(),
        }
    }

    /// Accessor that already holds `store`; the connection string is never read.
    pub fn preloaded(store: Arc<dyn Store>) -> Self {
        Self {
            settings: PoolSettings::default(),
            cell: OnceCell::with_value(store),
        }
    }

    /// Return the store handle, building it from `connection_string` on first use.
    ///
    /// Once a handle exists the argument is ignored. A failed call caches
    /// nothing, so a later call with a usable string still succeeds.
    ///
    /// # Errors
    ///
    /// `ConfigError::Missing` when no handle exists yet and the string is
    /// absent or blank; `ConfigError::Invalid` when it cannot be parsed.
    pub fn get_client(&self, connection_string: Option<&str>) -> Result<Arc<dyn Store>, ConfigError> {
        self.cell
            .get_or_try_init(|| -> Result<Arc<dyn Store>, ConfigError> {
                let url = connection_string
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::Missing {
                        key: DATABASE_URL_KEY,
                    })?;

                let store = PgStore::connect_lazy(url, self.settings).map_err(|e| {
                    ConfigError::Invalid {
                        key: DATABASE_URL_KEY,
                        reason: e.to_string(),
                    }
                })?;

                tracing::info!(
                    max_connections = self.settings.max_connections,
                    "Store client initialized"
                );
                Ok(Arc::new(store) as Arc<dyn Store>)
            })
            .map(Arc::clone)
    }

    /// Whether a handle has been built yet.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
