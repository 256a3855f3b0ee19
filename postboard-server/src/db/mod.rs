//! Database layer - store seam, connection pool, and repositories
//!
//! # Design Principles
//!
//! - Connection pool, built once per process through `StoreAccessor`
//! - All list operations use JOINs - no N+1 queries
//! - Rely on DB constraints, classify violations - no check-then-insert
//! - One store call per request

pub mod accessor;
pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod store;

pub use accessor::StoreAccessor;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use pool::{
    create_pool, create_pool_with_settings, PoolSettings, DEFAULT_ACQUIRE_TIMEOUT,
    DEFAULT_MAX_CONNECTIONS,
};
pub use repos::*;
pub use store::{PgStore, Store};
