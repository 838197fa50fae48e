//! # REST API for Draft Sessions
//!
//! Endpoints that drive the wizard one event at a time. Every endpoint needs
//! a signed-in author and only reaches that author's drafts.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use shared::{CreateDraftRequest, DraftEventRequest};
use tracing::{error, info};

use crate::domain::commands::drafts::DraftOutcome;
use crate::domain::wish_draft::{BlockReason, DraftEffect};
use crate::io::rest::mappers::draft_mapper::DraftMapper;
use crate::io::rest::{error_response, require_user};
use crate::AppState;

/// Create a router for draft related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_draft))
        .route("/:id", get(get_draft))
        .route("/:id/events", post(apply_event))
        .route("/:id/publish", post(publish_draft))
}

pub async fn create_draft(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateDraftRequest>,
) -> Response {
    info!("POST /api/drafts");

    let author = match require_user(&headers) {
        Ok(author) => author,
        Err(e) => return error_response(e),
    };

    match state.draft_service.create_draft(&author, request.draft) {
        Ok(outcome) => {
            let snapshot = DraftMapper::to_snapshot(&outcome.draft_id, &outcome.state);
            (StatusCode::CREATED, Json(snapshot)).into_response()
        }
        Err(e) => {
            error!("Failed to create draft: {}", e);
            error_response(e)
        }
    }
}

pub async fn get_draft(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    info!("GET /api/drafts/{}", id);

    let author = match require_user(&headers) {
        Ok(author) => author,
        Err(e) => return error_response(e),
    };

    match state.draft_service.get_draft(&author, &id) {
        Ok(outcome) => {
            let snapshot = DraftMapper::to_snapshot(&outcome.draft_id, &outcome.state);
            (StatusCode::OK, Json(snapshot)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Apply one wizard event. Blocked events still answer 200: the effect says
/// why and the snapshot is unchanged.
pub async fn apply_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<DraftEventRequest>,
) -> Response {
    info!("POST /api/drafts/{}/events - event: {:?}", id, request);

    let author = match require_user(&headers) {
        Ok(author) => author,
        Err(e) => return error_response(e),
    };

    let event = DraftMapper::to_domain_event(request);
    match state.draft_service.apply_event(&author, &id, event).await {
        Ok(outcome) => event_response(outcome),
        Err(e) => {
            error!("Failed to apply event to draft {}: {}", id, e);
            error_response(e)
        }
    }
}

/// Submit the draft for publishing
pub async fn publish_draft(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    info!("POST /api/drafts/{}/publish", id);

    let author = match require_user(&headers) {
        Ok(author) => author,
        Err(e) => return error_response(e),
    };

    match state.draft_service.submit(&author, &id).await {
        Ok(outcome) => event_response(outcome),
        Err(e) => {
            error!("Failed to publish draft {}: {}", id, e);
            error_response(e)
        }
    }
}

fn event_response(outcome: DraftOutcome) -> Response {
    let status = effect_status(&outcome.effect);
    (status, Json(DraftMapper::to_event_response(outcome))).into_response()
}

fn effect_status(effect: &DraftEffect) -> StatusCode {
    match effect {
        DraftEffect::NavigateToWish { .. } => StatusCode::CREATED,
        DraftEffect::PublishFailed { .. } => StatusCode::BAD_GATEWAY,
        DraftEffect::Blocked(BlockReason::PublishInFlight | BlockReason::AlreadyPublished) => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::OK,
    }
}
