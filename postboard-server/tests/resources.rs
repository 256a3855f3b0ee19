//! End-to-end handler behavior through the router, backed by the in-memory store

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use postboard_server::db::{
    MemoryStore, PostWithAuthor, Store, StoreAccessor, StoreError, UserWithPosts,
};
use postboard_server::models::{NewPost, NewUser, PostChanges, UserChanges};
use postboard_server::{build_router, AppState, ServerConfig};

fn app() -> Router {
    build_router(AppState::with_store(Arc::new(MemoryStore::new())))
}

/// Store whose every call fails with an unclassified driver error
struct FailingStore;

fn pool_timeout<T>() -> Result<T, StoreError> {
    Err(StoreError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl Store for FailingStore {
    async fn list_users(&self) -> Result<Vec<UserWithPosts>, StoreError> {
        pool_timeout()
    }
    async fn get_user(&self, _: i32) -> Result<UserWithPosts, StoreError> {
        pool_timeout()
    }
    async fn create_user(&self, _: NewUser) -> Result<UserWithPosts, StoreError> {
        pool_timeout()
    }
    async fn update_user(&self, _: i32, _: UserChanges) -> Result<UserWithPosts, StoreError> {
        pool_timeout()
    }
    async fn delete_user(&self, _: i32) -> Result<(), StoreError> {
        pool_timeout()
    }
    async fn list_posts(&self) -> Result<Vec<PostWithAuthor>, StoreError> {
        pool_timeout()
    }
    async fn get_post(&self, _: i32) -> Result<PostWithAuthor, StoreError> {
        pool_timeout()
    }
    async fn create_post(&self, _: NewPost) -> Result<PostWithAuthor, StoreError> {
        pool_timeout()
    }
    async fn update_post(&self, _: i32, _: PostChanges) -> Result<PostWithAuthor, StoreError> {
        pool_timeout()
    }
    async fn delete_post(&self, _: i32) -> Result<(), StoreError> {
        pool_timeout()
    }
    async fn migrate(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn failing_app(expose_error_details: bool) -> Router {
    build_router(AppState::new(
        StoreAccessor::preloaded(Arc::new(FailingStore)),
        None,
        expose_error_details,
    ))
}

/// Every store-backed route with a body that passes validation, and the action it reports.
fn store_routes() -> Vec<(&'static str, &'static str, Option<Value>, &'static str)> {
    vec![
        ("GET", "/users", None, "Failed to fetch users"),
        ("GET", "/users/1", None, "Failed to fetch user"),
        ("POST", "/users", Some(json!({"email": "a@x.com"})), "Failed to create user"),
        ("PUT", "/users/1", Some(json!({"name": "Ann"})), "Failed to update user"),
        ("DELETE", "/users/1", None, "Failed to delete user"),
        ("GET", "/posts", None, "Failed to fetch posts"),
        ("GET", "/posts/1", None, "Failed to fetch post"),
        ("POST", "/posts", Some(json!({"title": "Hi"})), "Failed to create post"),
        ("PUT", "/posts/1", Some(json!({"published": true})), "Failed to update post"),
        ("DELETE", "/posts/1", None, "Failed to delete post"),
    ]
}

/// Router whose store is unconfigured: any handler that reaches the store answers 500.
fn storeless_app() -> Router {
    build_router(AppState::from_config(&ServerConfig::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn user_lifecycle_scenario() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"email": "a@x.com", "name": "Ann"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"user": {"id": 1, "email": "a@x.com", "name": "Ann", "posts": []}})
    );

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"email": "a@x.com", "name": "Ann"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"error": "Email already exists"}));

    let (status, body) = send(&app, "GET", "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["name"], "Ann");

    let (status, body) = send(&app, "DELETE", "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "User deleted successfully"}));

    let (status, body) = send(&app, "GET", "/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));
}

#[tokio::test]
async fn duplicate_email_creates_no_row() {
    let app = app();
    send(&app, "POST", "/users", Some(json!({"email": "a@x.com"}))).await;
    send(&app, "POST", "/users", Some(json!({"email": "a@x.com"}))).await;

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_integer_ids_are_rejected_before_the_store() {
    let app = storeless_app();

    for (method, uri, body) in [
        ("GET", "/users/abc", None),
        ("PUT", "/users/1.5", Some(json!({"name": "x"}))),
        ("DELETE", "/users/one", None),
    ] {
        let (status, body) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body, json!({"error": "Invalid user ID"}));
    }

    for (method, uri, body) in [
        ("GET", "/posts/x1", None),
        ("PUT", "/posts/99999999999", Some(json!({"title": "t"}))),
        ("DELETE", "/posts/-", None),
    ] {
        let (status, body) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body, json!({"error": "Invalid post ID"}));
    }
}

#[tokio::test]
async fn missing_required_fields_are_rejected_before_the_store() {
    let app = storeless_app();

    let (status, body) = send(&app, "POST", "/users", Some(json!({"name": "Ann"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Email is required"}));

    let (status, body) = send(&app, "POST", "/users", Some(json!({"email": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Email is required"}));

    let (status, body) = send(&app, "POST", "/posts", Some(json!({"content": "c"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Title is required"}));
}

#[tokio::test]
async fn malformed_json_is_400_with_details() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Invalid JSON body");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn store_failures_name_the_operation() {
    let app = failing_app(false);

    for (method, uri, body, error) in store_routes() {
        let (status, body) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(body, json!({ "error": error }), "{method} {uri}");
    }
}

#[tokio::test]
async fn store_failures_carry_details_when_exposed() {
    let app = failing_app(true);
    let details = sqlx::Error::PoolTimedOut.to_string();

    for (method, uri, body, error) in store_routes() {
        let (status, body) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(
            body,
            json!({ "error": error, "details": details }),
            "{method} {uri}"
        );
    }
}

#[tokio::test]
async fn unconfigured_store_names_the_setting() {
    let app = storeless_app();

    let (status, body) = send(&app, "GET", "/posts", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "DATABASE_URL is not configured"}));

    // Valid input reaches the store and hits the same wall
    let (status, _) = send(&app, "POST", "/users", Some(json!({"email": "a@x.com"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn post_defaults_and_round_trip() {
    let app = app();

    let (status, body) = send(&app, "POST", "/posts", Some(json!({"title": "Hello"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"post": {
            "id": 1,
            "title": "Hello",
            "content": null,
            "published": false,
            "authorId": null,
            "author": null
        }})
    );

    let (status, fetched) = send(&app, "GET", "/posts/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn post_with_author_is_eager_loaded_both_ways() {
    let app = app();
    send(
        &app,
        "POST",
        "/users",
        Some(json!({"email": "a@x.com", "name": "Ann"})),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/posts",
        Some(json!({"title": "Hi", "content": "body", "published": true, "authorId": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["post"]["authorId"], 1);
    assert_eq!(
        body["post"]["author"],
        json!({"id": 1, "email": "a@x.com", "name": "Ann"})
    );

    let (_, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(
        body["users"][0]["posts"],
        json!([{"id": 1, "title": "Hi", "content": "body", "published": true, "authorId": 1}])
    );

    let (_, body) = send(&app, "GET", "/posts", None).await;
    assert_eq!(body["posts"][0]["author"]["email"], "a@x.com");
}

#[tokio::test]
async fn post_for_unknown_author_is_400() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/posts",
        Some(json!({"title": "Hi", "authorId": 42})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Author not found"}));
}

#[tokio::test]
async fn deleting_a_user_orphans_their_posts() {
    let app = app();
    send(&app, "POST", "/users", Some(json!({"email": "a@x.com"}))).await;
    send(
        &app,
        "POST",
        "/posts",
        Some(json!({"title": "Kept", "authorId": 1})),
    )
    .await;

    let (status, _) = send(&app, "DELETE", "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/posts/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["authorId"], Value::Null);
    assert_eq!(body["post"]["author"], Value::Null);
}

#[tokio::test]
async fn update_user_applies_only_given_fields() {
    let app = app();
    send(
        &app,
        "POST",
        "/users",
        Some(json!({"email": "a@x.com", "name": "Ann"})),
    )
    .await;

    let (status, body) = send(&app, "PUT", "/users/1", Some(json!({"name": "Annie"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["name"], "Annie");

    let (status, body) = send(&app, "PUT", "/users/1", Some(json!({"email": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Email is required"}));
}

#[tokio::test]
async fn explicit_null_leaves_nullable_fields_unchanged() {
    let app = app();
    send(
        &app,
        "POST",
        "/users",
        Some(json!({"email": "a@x.com", "name": "Ann"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/posts",
        Some(json!({"title": "T", "content": "C"})),
    )
    .await;

    let (status, body) = send(&app, "PUT", "/users/1", Some(json!({"name": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ann");

    let (status, body) = send(&app, "PUT", "/posts/1", Some(json!({"content": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["content"], "C");
}

#[tokio::test]
async fn update_user_email_collision_is_409() {
    let app = app();
    send(&app, "POST", "/users", Some(json!({"email": "a@x.com"}))).await;
    send(&app, "POST", "/users", Some(json!({"email": "b@x.com"}))).await;

    let (status, body) = send(&app, "PUT", "/users/2", Some(json!({"email": "a@x.com"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"error": "Email already exists"}));

    let (_, body) = send(&app, "GET", "/users/2", None).await;
    assert_eq!(body["user"]["email"], "b@x.com");
}

#[tokio::test]
async fn update_missing_targets_are_404() {
    let app = app();

    let (status, body) = send(&app, "PUT", "/users/7", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));

    let (status, body) = send(&app, "PUT", "/posts/7", Some(json!({"published": true}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Post not found"}));
}

#[tokio::test]
async fn update_post_toggles_published() {
    let app = app();
    send(&app, "POST", "/posts", Some(json!({"title": "Draft"}))).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/posts/1",
        Some(json!({"published": true, "title": "Final"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Final");
    assert_eq!(body["post"]["published"], true);
    assert_eq!(body["post"]["content"], Value::Null);
}

#[tokio::test]
async fn delete_post_then_get_is_404() {
    let app = app();
    send(&app, "POST", "/posts", Some(json!({"title": "Gone soon"}))).await;

    let (status, body) = send(&app, "DELETE", "/posts/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Post deleted successfully"}));

    let (status, _) = send(&app, "GET", "/posts/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", "/posts/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Post not found"}));
}

#[tokio::test]
async fn empty_lists_are_wrapped() {
    let app = app();

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"users": []}));

    let (status, body) = send(&app, "GET", "/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"posts": []}));
}
