//! Post repository
//!
//! Every read joins the author so callers never issue a second query.
//! Writes use a CTE around INSERT/UPDATE for the same reason.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::users::User;
use crate::db::StoreError;
use crate::models::{NewPost, PostChanges, Resource};

/// Post record from database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: Option<i32>,
}

/// Post with its author eagerly loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Option<User>,
}

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every post with its author.
    pub async fn list(&self) -> Result<Vec<PostWithAuthor>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                p.id,
                p.title,
                p.content,
                p.published,
                p.author_id,
                u.email AS author_email,
                u.name AS author_name
            FROM posts p
            LEFT JOIN users u ON u.id = p.author_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Get a single post with its author.
    pub async fn get(&self, id: i32) -> Result<PostWithAuthor, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                p.id,
                p.title,
                p.content,
                p.published,
                p.author_id,
                u.email AS author_email,
                u.name AS author_name
            FROM posts p
            LEFT JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found(Resource::Post))?;

        Ok(post_from_row(&row))
    }

    /// Insert a post. An unknown author surfaces as `MissingReference`.
    pub async fn create(&self, new: NewPost) -> Result<PostWithAuthor, StoreError> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO posts (title, content, published, author_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, title, content, published, author_id
            )
            SELECT
                i.id,
                i.title,
                i.content,
                i.published,
                i.author_id,
                u.email AS author_email,
                u.name AS author_name
            FROM inserted i
            LEFT JOIN users u ON u.id = i.author_id
            "#,
        )
        .bind(new.title.as_str())
        .bind(new.content.as_deref())
        .bind(new.published)
        .bind(new.author_id)
        .fetch_one(self.pool)
        .await?;

        Ok(post_from_row(&row))
    }

    /// Apply a partial update and return the post with its author.
    pub async fn update(&self, id: i32, changes: PostChanges) -> Result<PostWithAuthor, StoreError> {
        let row = sqlx::query(
            r#"
            WITH updated AS (
                UPDATE posts
                SET title = COALESCE($2, title),
                    content = COALESCE($3, content),
                    published = COALESCE($4, published)
                WHERE id = $1
                RETURNING id, title, content, published, author_id
            )
            SELECT
                d.id,
                d.title,
                d.content,
                d.published,
                d.author_id,
                u.email AS author_email,
                u.name AS author_name
            FROM updated d
            LEFT JOIN users u ON u.id = d.author_id
            "#,
        )
        .bind(id)
        .bind(changes.title.as_ref().map(|t| t.as_str()))
        .bind(changes.content.as_deref())
        .bind(changes.published)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found(Resource::Post))?;

        Ok(post_from_row(&row))
    }

    /// Delete a post.
    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Resource::Post));
        }

        Ok(())
    }
}

fn post_from_row(r: &PgRow) -> PostWithAuthor {
    let author_id: Option<i32> = r.get("author_id");
    let author_email: Option<String> = r.get("author_email");

    let author = match (author_id, author_email) {
        (Some(id), Some(email)) => Some(User {
            id,
            email,
            name: r.get("author_name"),
        }),
        _ => None,
    };

    PostWithAuthor {
        post: Post {
            id: r.get("id"),
            title: r.get("title"),
            content: r.get("content"),
            published: r.get("published"),
            author_id,
        },
        author,
    }
}
