//! Post endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use super::common::MessageResponse;
use super::users::UserSummary;
use crate::db::repos::{Post, PostWithAuthor};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, PostId};
use crate::models::{NewPost, PostChanges, PostTitle};
use crate::state::AppState;

/// Create post request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
    pub author_id: Option<i32>,
}

/// Update post request; absent or null fields are left unchanged, the author cannot be changed
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

/// Post without its author (inside a user's `posts`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: i32,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: Option<i32>,
}

impl From<Post> for PostSummary {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            title: p.title,
            content: p.content,
            published: p.published,
            author_id: p.author_id,
        }
    }
}

/// Post with its author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: Option<i32>,
    pub author: Option<UserSummary>,
}

impl From<PostWithAuthor> for PostResponse {
    fn from(p: PostWithAuthor) -> Self {
        Self {
            id: p.post.id,
            title: p.post.title,
            content: p.post.content,
            published: p.post.published,
            author_id: p.post.author_id,
            author: p.author.map(UserSummary::from),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostEnvelope {
    pub post: PostResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostsEnvelope {
    pub posts: Vec<PostResponse>,
}

impl From<PostWithAuthor> for PostEnvelope {
    fn from(p: PostWithAuthor) -> Self {
        Self { post: p.into() }
    }
}

/// GET /posts - list posts with their authors
async fn list_posts(State(state): State<AppState>) -> Result<Json<PostsEnvelope>, ApiError> {
    let posts = state
        .store()?
        .list_posts()
        .await
        .map_err(state.store_failure("fetch posts"))?;

    Ok(Json(PostsEnvelope {
        posts: posts.into_iter().map(PostResponse::from).collect(),
    }))
}

/// GET /posts/{id} - get a single post
async fn get_post(
    State(state): State<AppState>,
    PostId(id): PostId,
) -> Result<Json<PostEnvelope>, ApiError> {
    let post = state
        .store()?
        .get_post(id)
        .await
        .map_err(state.store_failure("fetch post"))?;

    Ok(Json(post.into()))
}

/// POST /posts - create a post, unpublished and authorless by default
async fn create_post(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostEnvelope>), ApiError> {
    let new = NewPost {
        title: PostTitle::required(req.title.as_deref())?,
        content: req.content,
        published: req.published.unwrap_or(false),
        author_id: req.author_id,
    };

    let post = state
        .store()?
        .create_post(new)
        .await
        .map_err(state.store_failure("create post"))?;

    tracing::debug!(id = post.post.id, "Post created");
    Ok((StatusCode::CREATED, Json(post.into())))
}

/// PUT /posts/{id} - update title, content, and/or published
async fn update_post(
    State(state): State<AppState>,
    PostId(id): PostId,
    JsonBody(req): JsonBody<UpdatePostRequest>,
) -> Result<Json<PostEnvelope>, ApiError> {
    let changes = PostChanges {
        title: req.title.as_deref().map(PostTitle::new).transpose()?,
        content: req.content,
        published: req.published,
    };

    let post = state
        .store()?
        .update_post(id, changes)
        .await
        .map_err(state.store_failure("update post"))?;

    Ok(Json(post.into()))
}

/// DELETE /posts/{id} - delete a post
async fn delete_post(
    State(state): State<AppState>,
    PostId(id): PostId,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store()?
        .delete_post(id)
        .await
        .map_err(state.store_failure("delete post"))?;

    tracing::debug!(id, "Post deleted");
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

/// Post routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}
