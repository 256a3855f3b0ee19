//! User endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use super::common::MessageResponse;
use super::posts::PostSummary;
use crate::db::repos::{User, UserWithPosts};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, UserId};
use crate::models::{Email, NewUser, UserChanges};
use crate::state::AppState;

/// Create user request
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Update user request; absent or null fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// User without relations (a post's author)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
        }
    }
}

/// User with their posts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub posts: Vec<PostSummary>,
}

impl From<UserWithPosts> for UserResponse {
    fn from(u: UserWithPosts) -> Self {
        Self {
            id: u.user.id,
            email: u.user.email,
            name: u.user.name,
            posts: u.posts.into_iter().map(PostSummary::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersEnvelope {
    pub users: Vec<UserResponse>,
}

impl From<UserWithPosts> for UserEnvelope {
    fn from(u: UserWithPosts) -> Self {
        Self { user: u.into() }
    }
}

/// GET /users - list users with their posts
async fn list_users(State(state): State<AppState>) -> Result<Json<UsersEnvelope>, ApiError> {
    let users = state
        .store()?
        .list_users()
        .await
        .map_err(state.store_failure("fetch users"))?;

    Ok(Json(UsersEnvelope {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /users/{id} - get a single user
async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = state
        .store()?
        .get_user(id)
        .await
        .map_err(state.store_failure("fetch user"))?;

    Ok(Json(user.into()))
}

/// POST /users - create a user
async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    let new = NewUser {
        email: Email::required(req.email.as_deref())?,
        name: req.name,
    };

    let user = state
        .store()?
        .create_user(new)
        .await
        .map_err(state.store_failure("create user"))?;

    tracing::debug!(id = user.user.id, "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /users/{id} - update email and/or name
async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let changes = UserChanges {
        email: req.email.as_deref().map(Email::new).transpose()?,
        name: req.name,
    };

    let user = state
        .store()?
        .update_user(id, changes)
        .await
        .map_err(state.store_failure("update user"))?;

    Ok(Json(user.into()))
}

/// DELETE /users/{id} - delete a user; their posts lose the author
async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store()?
        .delete_user(id)
        .await
        .map_err(state.store_failure("delete user"))?;

    tracing::debug!(id, "User deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// User routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
