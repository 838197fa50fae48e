//! # REST API Interface Layer
//!
//! HTTP endpoints for the wish wizard and viewer.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: catalog lookups, draft sessions, publishing and viewing
//! - **Identity**: reading the signed-in author from the request headers
//! - **Error Handling**: translating [`WishError`] into status codes and
//!   [`ApiError`] bodies
//! - **Logging**: method and path of every request at info, failures at error

pub mod catalog_apis;
pub mod draft_apis;
pub mod mappers;
pub mod wish_apis;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared::ApiError;
use tracing::error;

use crate::domain::models::wish::{AuthorId, WishError};

pub const AUTHOR_HEADER: &str = "x-wish-author";
pub const LOGIN_PATH: &str = "/login";

/// The signed-in author, if the request carries one
pub fn current_user(headers: &HeaderMap) -> Option<AuthorId> {
    headers
        .get(AUTHOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(AuthorId::new)
}

pub fn require_user(headers: &HeaderMap) -> Result<AuthorId, WishError> {
    current_user(headers).ok_or(WishError::SignInRequired)
}

pub fn error_status(e: &WishError) -> StatusCode {
    match e {
        WishError::NotFound(_) | WishError::DraftNotFound(_) => StatusCode::NOT_FOUND,
        WishError::SignInRequired => StatusCode::UNAUTHORIZED,
        WishError::NotDraftOwner => StatusCode::FORBIDDEN,
        WishError::NotReady(_) => StatusCode::UNPROCESSABLE_ENTITY,
        WishError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Turn a domain error into a JSON error response
pub fn error_response(e: WishError) -> Response {
    let status = error_status(&e);
    let body = match &e {
        WishError::SignInRequired => ApiError::with_redirect(e.to_string(), LOGIN_PATH),
        WishError::NotFound(_) => ApiError::new("Wish not found"),
        WishError::Storage(inner) => {
            error!("Internal error: {:#}", inner);
            ApiError::new("Internal error")
        }
        _ => ApiError::new(e.to_string()),
    };
    (status, Json(body)).into_response()
}
