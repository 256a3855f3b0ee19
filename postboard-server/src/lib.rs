//! postboard-server: HTTP resource layer over users and posts
//!
//! Validates requests, makes one store call per request, and maps the
//! outcome onto a status code and a JSON envelope.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use config::{ConfigError, ServerConfig, DATABASE_URL_KEY};
pub use http::{build_router, run_server};
pub use state::AppState;
