//! # Storage Module
//!
//! Persistence for published wishes.
//!
//! The domain only needs two capabilities from a document store: create a
//! document in a collection and read one back by id. Those are captured by
//! the [`DocumentStore`] trait so the backing store can be swapped without
//! touching domain code.
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: SQLite via SQLx, one JSON document per row
//! - **Repository**: `WishRepository` maps wish documents onto the store

pub mod connection;
pub mod document_store;
pub mod traits;
pub mod wish_repository;

pub use connection::DbConnection;
pub use document_store::SqliteDocumentStore;
pub use traits::DocumentStore;
pub use wish_repository::{WishRepository, WISHES_COLLECTION};
