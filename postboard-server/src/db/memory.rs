//! In-process store
//!
//! Mirrors the Postgres schema rules: unique email, author foreign key,
//! `ON DELETE SET NULL` for authored posts, ids never reused.
//! Used by `serve --memory` and by the router tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repos::{Post, PostWithAuthor, User, UserWithPosts};
use super::{Store, StoreError};
use crate::models::{NewPost, NewUser, PostChanges, Resource, UserChanges};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    posts: BTreeMap<i32, Post>,
    last_user_id: i32,
    last_post_id: i32,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn user_with_posts(&self, user: &User) -> UserWithPosts {
        UserWithPosts {
            user: user.clone(),
            posts: self
                .posts
                .values()
                .filter(|p| p.author_id == Some(user.id))
                .cloned()
                .collect(),
        }
    }

    fn post_with_author(&self, post: &Post) -> PostWithAuthor {
        PostWithAuthor {
            post: post.clone(),
            author: post.author_id.and_then(|id| self.users.get(&id).cloned()),
        }
    }
}

/// Store kept entirely in memory; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_users(&self) -> Result<Vec<UserWithPosts>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .map(|u| tables.user_with_posts(u))
            .collect())
    }

    async fn get_user(&self, id: i32) -> Result<UserWithPosts, StoreError> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&id)
            .map(|u| tables.user_with_posts(u))
            .ok_or_else(|| StoreError::not_found(Resource::User))
    }

    async fn create_user(&self, new: NewUser) -> Result<UserWithPosts, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(new.email.as_str(), None) {
            return Err(StoreError::UniqueViolation { field: "Email" });
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            email: new.email.into_string(),
            name: new.name,
        };
        tables.users.insert(user.id, user.clone());

        Ok(UserWithPosts {
            user,
            posts: Vec::new(),
        })
    }

    async fn update_user(
        &self,
        id: i32,
        changes: UserChanges,
    ) -> Result<UserWithPosts, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Err(StoreError::not_found(Resource::User));
        }
        if let Some(email) = &changes.email {
            if tables.email_taken(email.as_str(), Some(id)) {
                return Err(StoreError::UniqueViolation { field: "Email" });
            }
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Resource::User))?;
        if let Some(email) = changes.email {
            user.email = email.into_string();
        }
        if let Some(name) = changes.name {
            user.name = Some(name);
        }
        let user = user.clone();

        Ok(tables.user_with_posts(&user))
    }

    async fn delete_user(&self, id: i32) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(StoreError::not_found(Resource::User));
        }

        for post in tables.posts.values_mut() {
            if post.author_id == Some(id) {
                post.author_id = None;
            }
        }

        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<PostWithAuthor>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .map(|p| tables.post_with_author(p))
            .collect())
    }

    async fn get_post(&self, id: i32) -> Result<PostWithAuthor, StoreError> {
        let tables = self.tables.read().await;
        tables
            .posts
            .get(&id)
            .map(|p| tables.post_with_author(p))
            .ok_or_else(|| StoreError::not_found(Resource::Post))
    }

    async fn create_post(&self, new: NewPost) -> Result<PostWithAuthor, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(author_id) = new.author_id {
            if !tables.users.contains_key(&author_id) {
                return Err(StoreError::MissingReference { field: "Author" });
            }
        }

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            title: new.title.into_string(),
            content: new.content,
            published: new.published,
            author_id: new.author_id,
        };
        tables.posts.insert(post.id, post.clone());

        Ok(tables.post_with_author(&post))
    }

    async fn update_post(
        &self,
        id: i32,
        changes: PostChanges,
    ) -> Result<PostWithAuthor, StoreError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Resource::Post))?;

        if let Some(title) = changes.title {
            post.title = title.into_string();
        }
        if let Some(content) = changes.content {
            post.content = Some(content);
        }
        if let Some(published) = changes.published {
            post.published = published;
        }
        let post = post.clone();

        Ok(tables.post_with_author(&post))
    }

    async fn delete_post(&self, id: i32) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(Resource::Post))
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
