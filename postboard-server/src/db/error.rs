//! Store error type and classification of driver errors

use sqlx::error::ErrorKind;

use crate::models::Resource;

/// Unique constraint on `users.email`
pub const USERS_EMAIL_KEY: &str = "users_email_key";

/// Foreign key `posts.author_id -> users.id`
pub const POSTS_AUTHOR_FKEY: &str = "posts_author_id_fkey";

/// Failure reported by a [`Store`](super::Store) call
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{resource} not found")]
    NotFound { resource: Resource },

    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: &'static str },

    #[error("referenced {field} does not exist")]
    MissingReference { field: &'static str },

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn not_found(resource: Resource) -> Self {
        Self::NotFound { resource }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let classified = err.as_database_error().and_then(|db_err| {
            match (db_err.kind(), db_err.constraint()) {
                (ErrorKind::UniqueViolation, Some(USERS_EMAIL_KEY)) => {
                    Some(Self::UniqueViolation { field: "Email" })
                }
                (ErrorKind::ForeignKeyViolation, Some(POSTS_AUTHOR_FKEY)) => {
                    Some(Self::MissingReference { field: "Author" })
                }
                _ => None,
            }
        });

        classified.unwrap_or(Self::Database(err))
    }
}
