//! Application state shared across handlers

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::{Store, StoreAccessor, StoreError};
use crate::http::ApiError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    accessor: StoreAccessor,
    database_url: Option<String>,
    expose_error_details: bool,
}

impl AppState {
    pub fn new(
        accessor: StoreAccessor,
        database_url: Option<String>,
        expose_error_details: bool,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                accessor,
                database_url,
                expose_error_details,
            }),
        }
    }

    /// State backed by Postgres, connecting lazily on the first request.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            StoreAccessor::new(config.pool),
            config.database_url.clone(),
            config.expose_error_details,
        )
    }

    /// State around an already-built store.
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        Self::new(StoreAccessor::preloaded(store), None, false)
    }

    /// Store handle for this request.
    pub fn store(&self) -> Result<Arc<dyn Store>, ApiError> {
        Ok(self
            .inner
            .accessor
            .get_client(self.inner.database_url.as_deref())?)
    }

    /// Classify a store failure for `action` (e.g. "create user").
    ///
    /// Unclassified errors are logged here and only echoed back when
    /// `expose_error_details` is set.
    pub fn store_failure(&self, action: &'static str) -> impl Fn(StoreError) -> ApiError + '_ {
        move |err| match err {
            StoreError::NotFound { resource } => ApiError::NotFound { resource },
            StoreError::UniqueViolation { field } => ApiError::Conflict { field },
            StoreError::MissingReference { field } => ApiError::MissingReference { field },
            StoreError::Database(e) => {
                tracing::error!(action, error = %e, "Store operation failed");
                ApiError::Store {
                    action,
                    details: self.inner.expose_error_details.then(|| e.to_string()),
                }
            }
        }
    }
}
