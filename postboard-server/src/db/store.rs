//! The store seam handlers talk to
//!
//! Handlers only see `dyn Store`; `PgStore` backs it with Postgres and
//! [`MemoryStore`](super::MemoryStore) with process memory.

use async_trait::async_trait;
use sqlx::PgPool;

use super::pool::{create_lazy_pool, PoolSettings};
use super::repos::{PostRepo, PostWithAuthor, UserRepo, UserWithPosts};
use super::{migrations, StoreError};
use crate::models::{NewPost, NewUser, PostChanges, UserChanges};

/// One call per handler; each method is a single store operation.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserWithPosts>, StoreError>;
    async fn get_user(&self, id: i32) -> Result<UserWithPosts, StoreError>;
    async fn create_user(&self, new: NewUser) -> Result<UserWithPosts, StoreError>;
    async fn update_user(&self, id: i32, changes: UserChanges)
        -> Result<UserWithPosts, StoreError>;
    async fn delete_user(&self, id: i32) -> Result<(), StoreError>;

    async fn list_posts(&self) -> Result<Vec<PostWithAuthor>, StoreError>;
    async fn get_post(&self, id: i32) -> Result<PostWithAuthor, StoreError>;
    async fn create_post(&self, new: NewPost) -> Result<PostWithAuthor, StoreError>;
    async fn update_post(&self, id: i32, changes: PostChanges)
        -> Result<PostWithAuthor, StoreError>;
    async fn delete_post(&self, id: i32) -> Result<(), StoreError>;

    /// Bring the schema up to date. No-op for stores without a schema.
    async fn migrate(&self) -> Result<(), StoreError>;
}

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a store whose pool connects on first use.
    pub fn connect_lazy(database_url: &str, settings: PoolSettings) -> Result<Self, sqlx::Error> {
        Ok(Self::new(create_lazy_pool(database_url, settings)?))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_users(&self) -> Result<Vec<UserWithPosts>, StoreError> {
        UserRepo::new(&self.pool).list().await
    }

    async fn get_user(&self, id: i32) -> Result<UserWithPosts, StoreError> {
        UserRepo::new(&self.pool).get(id).await
    }

    async fn create_user(&self, new: NewUser) -> Result<UserWithPosts, StoreError> {
        UserRepo::new(&self.pool).create(new).await
    }

    async fn update_user(
        &self,
        id: i32,
        changes: UserChanges,
    ) -> Result<UserWithPosts, StoreError> {
        UserRepo::new(&self.pool).update(id, changes).await
    }

    async fn delete_user(&self, id: i32) -> Result<(), StoreError> {
        UserRepo::new(&self.pool).delete(id).await
    }

    async fn list_posts(&self) -> Result<Vec<PostWithAuthor>, StoreError> {
        PostRepo::new(&self.pool).list().await
    }

    async fn get_post(&self, id: i32) -> Result<PostWithAuthor, StoreError> {
        PostRepo::new(&self.pool).get(id).await
    }

    async fn create_post(&self, new: NewPost) -> Result<PostWithAuthor, StoreError> {
        PostRepo::new(&self.pool).create(new).await
    }

    async fn update_post(
        &self,
        id: i32,
        changes: PostChanges,
    ) -> Result<PostWithAuthor, StoreError> {
        PostRepo::new(&self.pool).update(id, changes).await
    }

    async fn delete_post(&self, id: i32) -> Result<(), StoreError> {
        PostRepo::new(&self.pool).delete(id).await
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        migrations::run(&self.pool).await
    }
}
