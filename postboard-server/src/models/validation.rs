//! Validation error types

use std::fmt;

use super::Resource;

/// Input rejected before any store call is made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is missing or blank
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Path identifier is not an integer
    InvalidId { resource: Resource },

    /// Request body is not valid JSON for the endpoint
    MalformedBody { reason: String },
}

impl ValidationError {
    /// Short detail to attach next to the message, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::MalformedBody { reason } => Some(reason.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidId { resource } => write!(f, "Invalid {} ID", resource.singular()),
            Self::MalformedBody { .. } => write!(f, "Invalid JSON body"),
        }
    }
}

impl std::error::Error for ValidationError {}
