//! # IO Module
//!
//! The adapter layer between HTTP clients and the domain. It turns requests
//! into domain calls and domain results into the DTOs of the `shared` crate.
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum
//! - **Serialization**: Serde JSON
//! - **State Management**: Axum `State` extractor carrying [`crate::AppState`]
//! - **Identity**: an opaque author id in the `x-wish-author` header, set by
//!   whatever authenticates users in front of this service

pub mod rest;
