//! API error types with IntoResponse
//!
//! Errors are converted to `{"error": ..., "details"?: ...}` JSON bodies
//! with the matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::models::{Resource, ValidationError};

/// Failure body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed before the store was touched (400)
    Validation(ValidationError),

    /// No row with the requested id (404)
    NotFound { resource: Resource },

    /// Unique constraint violated (409)
    Conflict { field: &'static str },

    /// Foreign key points at a missing row (400)
    MissingReference { field: &'static str },

    /// Store client unavailable (500)
    Config(ConfigError),

    /// Unclassified store failure (500, already logged)
    Store {
        action: &'static str,
        details: Option<String>,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MissingReference { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Config(_) | Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Validation(e) => ErrorBody {
                error: e.to_string(),
                details: e.details(),
            },
            Self::NotFound { resource } => ErrorBody {
                error: format!("{} not found", resource.title()),
                details: None,
            },
            Self::Conflict { field } => ErrorBody {
                error: format!("{} already exists", field),
                details: None,
            },
            Self::MissingReference { field } => ErrorBody {
                error: format!("{} not found", field),
                details: None,
            },
            Self::Config(ConfigError::Missing { key }) => ErrorBody {
                error: format!("{} is not configured", key),
                details: None,
            },
            Self::Config(ConfigError::Invalid { key, .. }) => ErrorBody {
                error: format!("{} is invalid", key),
                details: None,
            },
            Self::Store { action, details } => ErrorBody {
                error: format!("Failed to {}", action),
                details: details.clone(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Config(e) = &self {
            tracing::error!("Store unavailable: {}", e);
        }

        (self.status(), Json(self.body())).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<ConfigError> for ApiError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
