//! # Wish Repository
//!
//! Reads and writes wish documents in the `wishes` collection. Documents are
//! written once at publish time and never updated.
//!
//! ## Document Format
//!
//! ```json
//! {
//!   "recipientName": "Sam",
//!   "occasion": "birthday",
//!   "message": "Happy birthday!",
//!   "templateId": "constellation",
//!   "customThemePrompt": "",
//!   "memories": ["The day we met", "..."],
//!   "authorId": "uid-123",
//!   "createdAt": "2026-01-20T10:00:00+00:00",
//!   "status": "published"
//! }
//! ```

use anyhow::{Context, Result};
use shared::PublishedWish;
use std::sync::Arc;
use tracing::{debug, info};

use super::traits::DocumentStore;
use crate::domain::models::wish::DomainWish;

pub const WISHES_COLLECTION: &str = "wishes";

#[derive(Clone)]
pub struct WishRepository {
    store: Arc<dyn DocumentStore>,
}

impl WishRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist a new wish document and return its id
    pub async fn store_wish(&self, document: &PublishedWish) -> Result<String> {
        let fields = serde_json::to_value(document)?;
        let id = self.store.create(WISHES_COLLECTION, fields).await?;
        info!("Stored wish {} for '{}'", id, document.recipient_name);
        Ok(id)
    }

    pub async fn get_wish(&self, id: &str) -> Result<Option<DomainWish>> {
        let Some(fields) = self.store.get_by_id(WISHES_COLLECTION, id).await? else {
            debug!("Wish {} not found", id);
            return Ok(None);
        };

        let document: PublishedWish = serde_json::from_value(fields)
            .with_context(|| format!("Wish {} has an unreadable shape", id))?;
        Ok(Some(DomainWish::from_document(id, document)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DbConnection, SqliteDocumentStore};
    use serde_json::json;
    use shared::WishStatus;

    async fn setup() -> (WishRepository, Arc<SqliteDocumentStore>) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let store = Arc::new(SqliteDocumentStore::new(db));
        (WishRepository::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_store_and_load_wish() {
        let (repository, _) = setup().await;
        let document = PublishedWish {
            recipient_name: "Sam".to_string(),
            occasion: "birthday".to_string(),
            message: "hi".to_string(),
            template_id: "found-footage".to_string(),
            clips: Some(vec![]),
            author_id: "uid-1".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            ..Default::default()
        };

        let id = repository.store_wish(&document).await.unwrap();
        let wish = repository.get_wish(&id).await.unwrap().expect("wish should exist");
        assert_eq!(wish.id, id);
        assert_eq!(wish.to_document(), document);
    }

    #[tokio::test]
    async fn test_loads_legacy_documents() {
        let (repository, store) = setup().await;
        let id = store
            .create(
                WISHES_COLLECTION,
                json!({"recipientName": "Kim", "message": "yo", "userId": "old-uid"}),
            )
            .await
            .unwrap();

        let wish = repository.get_wish(&id).await.unwrap().unwrap();
        assert_eq!(wish.author_id, "old-uid");
        assert_eq!(wish.occasion, "");
        assert_eq!(wish.template_id, "");
        assert_eq!(wish.status, WishStatus::Published);
    }

    #[tokio::test]
    async fn test_loads_documents_with_malformed_fields() {
        let (repository, store) = setup().await;
        let documents = [
            json!({"templateId": null, "occasion": "wedding"}),
            json!({
                "templateId": "constellation",
                "memories": ["a", "b", "c"],
                "createdAt": {"seconds": 1700000000, "nanoseconds": 0}
            }),
            json!({"templateId": "birthday-1", "gameTarget": 300}),
        ];

        let mut loaded = Vec::new();
        for document in documents {
            let id = store.create(WISHES_COLLECTION, document).await.unwrap();
            loaded.push(repository.get_wish(&id).await.unwrap().expect("wish should load"));
        }

        assert_eq!(loaded[0].template_id, "");
        assert_eq!(loaded[0].occasion, "wedding");
        assert_eq!(loaded[1].template_id, "constellation");
        assert_eq!(loaded[1].created_at, "");
        assert_eq!(loaded[2].template_id, "birthday-1");
    }

    #[tokio::test]
    async fn test_missing_wish() {
        let (repository, _) = setup().await;
        assert!(repository.get_wish("missing").await.unwrap().is_none());
    }
}
