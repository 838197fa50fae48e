//! # SQLite Document Store
//!
//! Stores each document as a JSON body keyed by `(collection, id)`.
//! Ids are random UUIDs in simple (hyphen-less) form.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

use super::connection::DbConnection;
use super::traits::DocumentStore;

#[derive(Clone)]
pub struct SqliteDocumentStore {
    db: DbConnection,
}

impl SqliteDocumentStore {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn create(&self, collection: &str, fields: Value) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let body = serde_json::to_string(&fields)?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(&body)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.pool())
        .await
        .with_context(|| format!("Failed to create document in '{}'", collection))?;

        debug!("Created document {}/{}", collection, id);
        Ok(id)
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let row = sqlx::query(
            r#"
            SELECT body
            FROM documents
            WHERE collection = ? AND id = ?
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => {
                let body: String = r.get("body");
                let value = serde_json::from_str(&body)
                    .with_context(|| format!("Corrupt document {}/{}", collection, id))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn setup_store() -> SqliteDocumentStore {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        SqliteDocumentStore::new(db)
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = setup_store().await;
        let id = store
            .create("wishes", json!({"recipientName": "Sam"}))
            .await
            .expect("create failed");
        assert_eq!(id.len(), 32);

        let doc = store.get_by_id("wishes", &id).await.unwrap().unwrap();
        assert_eq!(doc["recipientName"], "Sam");
    }

    #[tokio::test]
    async fn test_missing_document_is_none() {
        let store = setup_store().await;
        assert!(store.get_by_id("wishes", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let store = setup_store().await;
        let id = store.create("wishes", json!({})).await.unwrap();
        assert!(store.get_by_id("drafts", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = setup_store().await;
        let first = store.create("wishes", json!({"n": 1})).await.unwrap();
        let second = store.create("wishes", json!({"n": 2})).await.unwrap();
        assert_ne!(first, second);
    }
}
