//! Shared response shapes

use serde::{Deserialize, Serialize};

/// `{"message": ...}` body for deletions and the welcome route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
