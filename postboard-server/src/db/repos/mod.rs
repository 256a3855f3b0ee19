//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Uses JOINs for list operations (no N+1)
//! - Lets constraints reject conflicts (no check-then-insert)
//! - One statement per operation

pub mod posts;
pub mod users;

pub use posts::{Post, PostRepo, PostWithAuthor};
pub use users::{User, UserRepo, UserWithPosts};
