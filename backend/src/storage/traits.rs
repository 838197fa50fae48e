//! # Storage Traits
//!
//! Abstraction over the document store so the domain layer can run against
//! SQLite in production and in-memory stores in tests.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Minimal document store: create and read by id. No query, update or delete.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document and return its generated id
    async fn create(&self, collection: &str, fields: Value) -> Result<String>;

    /// Fetch a document by id, `None` if it doesn't exist
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>>;
}
