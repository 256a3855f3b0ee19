//! User repository
//!
//! - list/get: LEFT JOIN posts, folded in Rust (no N+1)
//! - create/update: rely on the email unique constraint, no check-then-insert
//! - update: CTE so the returned row carries its posts in one round trip

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};

use super::posts::Post;
use crate::db::StoreError;
use crate::models::{NewUser, Resource, UserChanges};

/// User record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
}

/// User with authored posts, ordered by post id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithPosts {
    pub user: User,
    pub posts: Vec<Post>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every user with their posts.
    pub async fn list(&self) -> Result<Vec<UserWithPosts>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                u.id AS user_id,
                u.email,
                u.name,
                p.id AS post_id,
                p.title,
                p.content,
                p.published
            FROM users u
            LEFT JOIN posts p ON p.author_id = u.id
            ORDER BY u.id, p.id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(fold_user_rows(rows))
    }

    /// Get a single user with their posts.
    pub async fn get(&self, id: i32) -> Result<UserWithPosts, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                u.id AS user_id,
                u.email,
                u.name,
                p.id AS post_id,
                p.title,
                p.content,
                p.published
            FROM users u
            LEFT JOIN posts p ON p.author_id = u.id
            WHERE u.id = $1
            ORDER BY p.id
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        fold_user_rows(rows)
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(Resource::User))
    }

    /// Insert a user. A duplicate email surfaces as `UniqueViolation`.
    pub async fn create(&self, new: NewUser) -> Result<UserWithPosts, StoreError> {
        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (email, name)
            VALUES ($1, $2)
            RETURNING id, email, name
            "#,
        )
        .bind(new.email.as_str())
        .bind(new.name.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(UserWithPosts {
            user,
            posts: Vec::new(),
        })
    }

    /// Apply a partial update and return the user with their posts.
    pub async fn update(&self, id: i32, changes: UserChanges) -> Result<UserWithPosts, StoreError> {
        let rows = sqlx::query(
            r#"
            WITH updated AS (
                UPDATE users
                SET email = COALESCE($2, email),
                    name = COALESCE($3, name)
                WHERE id = $1
                RETURNING id, email, name
            )
            SELECT
                u.id AS user_id,
                u.email,
                u.name,
                p.id AS post_id,
                p.title,
                p.content,
                p.published
            FROM updated u
            LEFT JOIN posts p ON p.author_id = u.id
            ORDER BY p.id
            "#,
        )
        .bind(id)
        .bind(changes.email.as_ref().map(|e| e.as_str()))
        .bind(changes.name.as_deref())
        .fetch_all(self.pool)
        .await?;

        fold_user_rows(rows)
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(Resource::User))
    }

    /// Delete a user. Their posts keep existing with a null author
    /// (`ON DELETE SET NULL`).
    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Resource::User));
        }

        Ok(())
    }
}

/// Collapse `users LEFT JOIN posts` rows, sorted by user id, into one entry per user.
fn fold_user_rows(rows: Vec<PgRow>) -> Vec<UserWithPosts> {
    let mut users: Vec<UserWithPosts> = Vec::new();

    for r in rows {
        let user_id: i32 = r.get("user_id");
        if users.last().map(|u| u.user.id) != Some(user_id) {
            users.push(UserWithPosts {
                user: User {
                    id: user_id,
                    email: r.get("email"),
                    name: r.get("name"),
                },
                posts: Vec::new(),
            });
        }

        let post_id: Option<i32> = r.get("post_id");
        if let (Some(post_id), Some(current)) = (post_id, users.last_mut()) {
            current.posts.push(Post {
                id: post_id,
                title: r.get("title"),
                content: r.get("content"),
                published: r.get("published"),
                author_id: Some(user_id),
            });
        }
    }

    users
}
