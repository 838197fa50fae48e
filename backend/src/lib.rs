//! # Wishes Backend
//!
//! Contains all non-UI logic for authoring, publishing and viewing wishes.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! HTTP clients (wizard, viewer)
//!     ↓
//! IO Layer (REST API, DTO mappers)
//!     ↓
//! Domain Layer (draft state machine, dispatch, services)
//!     ↓
//! Storage Layer (document store)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Set up the REST API router with CORS for the configured frontend origin
//! - Serve the frontend's static files when a directory is configured

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderName, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::ServerConfig;
use crate::domain::{DraftSessionService, TemplateCatalog, WishService};
use crate::io::rest::{catalog_apis, draft_apis, wish_apis, AUTHOR_HEADER};
use crate::storage::{DbConnection, SqliteDocumentStore, WishRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub wish_service: WishService,
    pub draft_service: DraftSessionService,
    pub catalog: Arc<TemplateCatalog>,
}

impl AppState {
    fn from_connection(db_conn: DbConnection, config: &ServerConfig) -> Self {
        let store = Arc::new(SqliteDocumentStore::new(db_conn));
        let wish_service = WishService::new(WishRepository::new(store), config.dispatch_order);
        let catalog = TemplateCatalog::standard();
        let draft_service =
            DraftSessionService::new(catalog.clone(), Arc::new(wish_service.clone()));

        Self {
            wish_service,
            draft_service,
            catalog,
        }
    }

    /// State backed by a private in-memory database
    #[cfg(test)]
    pub(crate) async fn for_tests() -> Self {
        let db_conn = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        Self::from_connection(db_conn, &ServerConfig::default())
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &ServerConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db_conn = DbConnection::new(&config.database_url).await?;

    info!("Setting up application state (dispatch order {:?})", config.dispatch_order);
    Ok(AppState::from_connection(db_conn, config))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &ServerConfig) -> Result<Router> {
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid allowed origin '{}'", config.allowed_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(AUTHOR_HEADER),
        ]);

    let api_routes = Router::new()
        .merge(catalog_apis::router())
        .nest("/drafts", draft_apis::router())
        .nest("/wishes", wish_apis::router());

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(app_state);

    if let Some(static_dir) = &config.static_dir {
        info!("Serving static files from {:?}", static_dir);
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    Ok(app.layer(cors))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    pub async fn test_router() -> Router {
        create_router(AppState::for_tests().await, &ServerConfig::default()).unwrap()
    }

    pub fn get(uri: &str, author: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(author) = author {
            builder = builder.header(AUTHOR_HEADER, author);
        }
        builder.body(Body::empty()).unwrap()
    }

    pub fn post_json(uri: &str, author: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(author) = author {
            builder = builder.header(AUTHOR_HEADER, author);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    /// Send a request and decode the JSON response
    pub async fn send<T: DeserializeOwned>(app: &Router, request: Request<Body>) -> (StatusCode, T) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|e| panic!("unexpected body {:?}: {}", bytes, e));
        (status, body)
    }
}
