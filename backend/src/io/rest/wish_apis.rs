//! # REST API for Published Wishes
//!
//! Direct publishing of a complete draft and the public viewer endpoint.
//! Viewing needs no identity: anyone with the link can open a wish.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use shared::{ApiError, CreateWishRequest};
use tracing::{error, info};

use crate::domain::models::wish::WishError;
use crate::io::rest::mappers::wish_mapper::WishMapper;
use crate::io::rest::{error_response, require_user};
use crate::AppState;

/// Create a router for wish related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_wish))
        .route("/:id", get(get_wish))
}

/// Publish a complete draft in one request
pub async fn create_wish(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateWishRequest>,
) -> impl IntoResponse {
    info!("POST /api/wishes - template: {}", request.draft.template_id);

    let author = match require_user(&headers) {
        Ok(author) => author,
        Err(e) => return error_response(e),
    };

    match state.wish_service.create_from_draft(&author, &request.draft).await {
        Ok(wish_id) => {
            let response = WishMapper::to_create_response(wish_id);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(WishError::Storage(e)) => {
            error!("Failed to publish wish: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiError::new("Failed to publish wish, please try again")),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to publish wish: {}", e);
            error_response(e)
        }
    }
}

/// Load a wish with its variant, theme and capsule state
pub async fn get_wish(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/wishes/{}", id);

    match state.wish_service.view_wish(&id, Utc::now()).await {
        Ok(view) => (StatusCode::OK, Json(WishMapper::to_view_response(view))).into_response(),
        Err(WishError::Storage(e)) => {
            error!("Failed to load wish {}: {:#}", id, e);
            error_response(WishError::NotFound(id))
        }
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get, post_json, send, test_router};
    use axum::http::StatusCode;
    use serde_json::json;
    use shared::{ApiError, CreateWishResponse, TemplateVariant, WishViewResponse};

    fn constellation_draft() -> serde_json::Value {
        json!({
            "draft": {
                "recipientName": "  Sam ",
                "occasion": "anniversary",
                "message": "Ten years",
                "templateId": "constellation",
                "memories": ["first date", "", "the move", "the dog"]
            }
        })
    }

    #[tokio::test]
    async fn test_create_requires_sign_in() {
        let app = test_router().await;
        let (status, body): (_, ApiError) =
            send(&app, post_json("/api/wishes", None, constellation_draft())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.redirect.as_deref(), Some("/login"));
    }

    #[tokio::test]
    async fn test_create_then_view() {
        let app = test_router().await;
        let (status, created): (_, CreateWishResponse) =
            send(&app, post_json("/api/wishes", Some("uid-1"), constellation_draft())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.redirect, format!("/view/{}", created.wish_id));

        let uri = format!("/api/wishes/{}", created.wish_id);
        let (status, view): (_, WishViewResponse) = send(&app, get(&uri, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view.variant, TemplateVariant::Constellation);
        assert_eq!(view.wish.recipient_name, "Sam");
        assert_eq!(view.wish.author_id, "uid-1");
        assert_eq!(view.wish.memories.as_ref().map(Vec::len), Some(3));
        assert_eq!(view.occasion_config.label, "Anniversary 💖");
        assert!(view.capsule.is_none());
    }

    #[tokio::test]
    async fn test_create_incomplete_draft() {
        let app = test_router().await;
        let draft = json!({"draft": {"recipientName": "Sam", "message": "  "}});
        let (status, _): (_, ApiError) = send(&app, post_json("/api/wishes", Some("uid-1"), draft)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_view_missing_wish() {
        let app = test_router().await;
        let (status, body): (_, ApiError) = send(&app, get("/api/wishes/nope", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Wish not found");
    }
}
