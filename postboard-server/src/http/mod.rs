//! HTTP server layer
//!
//! Axum server with:
//! - Open CORS policy
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use server::{build_router, run_server, ServerError};
