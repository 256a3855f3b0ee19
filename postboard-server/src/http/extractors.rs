//! Custom Axum extractors
//!
//! Rejections are `ApiError`s, so malformed ids and bodies get the same
//! JSON error envelope as everything else.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::{Resource, ValidationError};

async fn parse_id<S>(parts: &mut Parts, state: &S, resource: Resource) -> Result<i32, ApiError>
where
    S: Send + Sync,
{
    let invalid = || ApiError::Validation(ValidationError::InvalidId { resource });

    let Path(raw): Path<String> = Path::from_request_parts(parts, state)
        .await
        .map_err(|_| invalid())?;

    raw.trim().parse::<i32>().map_err(|_| invalid())
}

/// Extract and validate a user id from path
pub struct UserId(pub i32);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parse_id(parts, state, Resource::User).await.map(Self)
    }
}

/// Extract and validate a post id from path
pub struct PostId(pub i32);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parse_id(parts, state, Resource::Post).await.map(Self)
    }
}

/// JSON body whose rejection is a 400 with the parser message as details
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                ApiError::Validation(ValidationError::MalformedBody {
                    reason: rejection.body_text(),
                })
            })?;

        Ok(Self(value))
    }
}
