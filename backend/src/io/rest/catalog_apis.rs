//! # REST API for Occasions and Templates
//!
//! Read-only lookups the wizard needs before any draft exists.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::TemplateListResponse;
use tracing::info;

use crate::domain::occasion_config::resolve_occasion_config;
use crate::AppState;

/// Create a router for catalog related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/occasions/:occasion", get(get_occasion_config))
        .route("/templates", get(list_templates))
}

/// Theme config for an occasion. Unknown occasions get the custom theme.
pub async fn get_occasion_config(Path(occasion): Path<String>) -> impl IntoResponse {
    info!("GET /api/occasions/{}", occasion);
    (StatusCode::OK, Json(resolve_occasion_config(&occasion).clone()))
}

pub async fn list_templates(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/templates");
    let response = TemplateListResponse {
        templates: state.catalog.to_infos(),
    };
    (StatusCode::OK, Json(response))
}
