//! Schema migrations for the users/posts tables
//!
//! Idempotent: every statement is `IF NOT EXISTS`, so this runs on each startup.

use sqlx::PgPool;

use super::error::{POSTS_AUTHOR_FKEY, USERS_EMAIL_KEY};
use super::StoreError;

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), StoreError> {
    tracing::info!("Running postboard migrations...");

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            email TEXT NOT NULL,
            name TEXT,
            CONSTRAINT {USERS_EMAIL_KEY} UNIQUE (email)
        )
        "#
    ))
    .execute(pool)
    .await?;

    // Deleting a user keeps their posts and clears the author
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT,
            published BOOLEAN NOT NULL DEFAULT FALSE,
            author_id INTEGER,
            CONSTRAINT {POSTS_AUTHOR_FKEY} FOREIGN KEY (author_id)
                REFERENCES users(id) ON DELETE SET NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id)")
        .execute(pool)
        .await?;

    tracing::info!("Postboard migrations complete");
    Ok(())
}
