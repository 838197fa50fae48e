//! Wish publishing and viewing.
//!
//! ## Key Responsibilities
//!
//! - **Publishing**: turning a finished draft into an immutable document
//!   stamped with author, creation time and `published` status
//! - **Viewing**: loading a document by id and resolving its presentation
//!   variant, occasion config and (for time capsules) lock state

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{TemplateVariant, WishDraft};
use tracing::info;

use super::commands::wishes::WishView;
use super::models::wish::{AuthorId, WishError, WishPayload, WishSubmission};
use super::occasion_config::resolve_occasion_config;
use super::template_dispatch::{dispatch_with, DispatchOrder};
use super::time_capsule::capsule_status;
use super::wish_draft::{publish_readiness, shape_submission};
use crate::storage::WishRepository;

/// Boundary to whatever persists a finished wish
#[async_trait]
pub trait WishPublisher: Send + Sync {
    /// Persist the submission for `author` and return the new wish id
    async fn publish(&self, author: &AuthorId, submission: WishSubmission) -> Result<String>;
}

#[derive(Clone)]
pub struct WishService {
    repository: WishRepository,
    dispatch_order: DispatchOrder,
}

impl WishService {
    pub fn new(repository: WishRepository, dispatch_order: DispatchOrder) -> Self {
        Self {
            repository,
            dispatch_order,
        }
    }

    /// Publish a complete draft without going through a draft session
    pub async fn create_from_draft(
        &self,
        author: &AuthorId,
        draft: &WishDraft,
    ) -> Result<String, WishError> {
        publish_readiness(draft).map_err(WishError::NotReady)?;
        let wish_id = self.publish(author, shape_submission(draft)).await?;
        Ok(wish_id)
    }

    /// Load a wish and resolve how it should be presented at `now`
    pub async fn view_wish(&self, id: &str, now: DateTime<Utc>) -> Result<WishView, WishError> {
        let wish = self
            .repository
            .get_wish(id)
            .await?
            .ok_or_else(|| WishError::NotFound(id.to_string()))?;

        let variant = dispatch_with(self.dispatch_order, &wish.template_fields());
        let occasion_config = resolve_occasion_config(&wish.occasion);

        let capsule = match (&variant, &wish.payload) {
            (
                TemplateVariant::TimeCapsule,
                WishPayload::TimeCapsule {
                    unlock_date,
                    teaser_message,
                },
            ) => Some(capsule_status(
                Some(unlock_date.as_str()),
                Some(teaser_message.as_str()),
                now,
            )),
            _ => None,
        };

        info!("Viewing wish {} as {:?}", id, variant);
        Ok(WishView {
            wish,
            variant,
            occasion_config,
            capsule,
        })
    }
}

#[async_trait]
impl WishPublisher for WishService {
    async fn publish(&self, author: &AuthorId, submission: WishSubmission) -> Result<String> {
        info!("Publishing '{}' wish for author {}", submission.template_id, author);
        let document = submission.into_document(author, Utc::now().to_rfc3339());
        self.repository.store_wish(&document).await
    }
}
