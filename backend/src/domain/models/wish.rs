use shared::{Clip, Occasion, PublishedWish, WishStatus};
use std::fmt;

use crate::domain::template_dispatch::StoredTemplateFields;
use crate::domain::wish_draft::BlockReason;

const DEFAULT_GAME_TARGET: u8 = 10;

/// Template-specific data of a wish. Only the payload matching the
/// template id is ever carried.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WishPayload {
    #[default]
    None,
    Constellation {
        memories: Vec<String>,
    },
    Soundtrack {
        tracks: Vec<String>,
    },
    TimeCapsule {
        unlock_date: String,
        teaser_message: String,
    },
    PlayableWish {
        game_target: u8,
    },
    FoundFootage {
        clips: Vec<Clip>,
    },
}

/// A finished draft, shaped for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishSubmission {
    pub recipient_name: String,
    pub occasion: Occasion,
    pub message: String,
    pub template_id: String,
    pub custom_theme_prompt: String,
    pub payload: WishPayload,
}

/// A wish as loaded back from the document store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainWish {
    pub id: String,
    pub recipient_name: String,
    /// Raw stored value, possibly unknown to this build
    pub occasion: String,
    pub message: String,
    pub template_id: String,
    pub custom_theme_prompt: String,
    pub payload: WishPayload,
    pub author_id: String,
    pub created_at: String,
    pub status: WishStatus,
}

impl WishPayload {
    /// Read the payload that belongs to `template_id` out of a stored document
    pub fn from_document(template_id: &str, document: &PublishedWish) -> Self {
        match template_id {
            "constellation" => WishPayload::Constellation {
                memories: document.memories.clone().unwrap_or_default(),
            },
            "soundtrack" => WishPayload::Soundtrack {
                tracks: document.tracks.clone().unwrap_or_default(),
            },
            "time-capsule" => WishPayload::TimeCapsule {
                unlock_date: document.unlock_date.clone().unwrap_or_default(),
                teaser_message: document.teaser_message.clone().unwrap_or_default(),
            },
            "playable-wish" => WishPayload::PlayableWish {
                game_target: document.game_target.unwrap_or(DEFAULT_GAME_TARGET),
            },
            "found-footage" => WishPayload::FoundFootage {
                clips: document.clips.clone().unwrap_or_default(),
            },
            _ => WishPayload::None,
        }
    }

    /// Write the payload's fields into a document, leaving the others absent
    fn write_into(self, document: &mut PublishedWish) {
        match self {
            WishPayload::None => {}
            WishPayload::Constellation { memories } => document.memories = Some(memories),
            WishPayload::Soundtrack { tracks } => document.tracks = Some(tracks),
            WishPayload::TimeCapsule {
                unlock_date,
                teaser_message,
            } => {
                document.unlock_date = Some(unlock_date);
                document.teaser_message = Some(teaser_message);
            }
            WishPayload::PlayableWish { game_target } => document.game_target = Some(game_target),
            WishPayload::FoundFootage { clips } => document.clips = Some(clips),
        }
    }
}

impl WishSubmission {
    /// Build the document persisted at publish time
    pub fn into_document(self, author: &AuthorId, created_at: String) -> PublishedWish {
        let mut document = PublishedWish {
            recipient_name: self.recipient_name,
            occasion: self.occasion.as_str().to_string(),
            message: self.message,
            template_id: self.template_id,
            custom_theme_prompt: self.custom_theme_prompt,
            author_id: author.as_str().to_string(),
            created_at,
            status: WishStatus::Published,
            ..Default::default()
        };
        self.payload.write_into(&mut document);
        document
    }
}

impl DomainWish {
    pub fn from_document(id: &str, document: PublishedWish) -> Self {
        let payload = WishPayload::from_document(&document.template_id, &document);
        Self {
            id: id.to_string(),
            recipient_name: document.recipient_name,
            occasion: document.occasion,
            message: document.message,
            template_id: document.template_id,
            custom_theme_prompt: document.custom_theme_prompt,
            payload,
            author_id: document.author_id,
            created_at: document.created_at,
            status: document.status,
        }
    }

    pub fn to_document(&self) -> PublishedWish {
        let mut document = PublishedWish {
            recipient_name: self.recipient_name.clone(),
            occasion: self.occasion.clone(),
            message: self.message.clone(),
            template_id: self.template_id.clone(),
            custom_theme_prompt: self.custom_theme_prompt.clone(),
            author_id: self.author_id.clone(),
            created_at: self.created_at.clone(),
            status: self.status,
            ..Default::default()
        };
        self.payload.clone().write_into(&mut document);
        document
    }

    pub fn template_fields(&self) -> StoredTemplateFields {
        StoredTemplateFields {
            template_id: self.template_id.clone(),
            occasion: self.occasion.clone(),
        }
    }
}

/// Opaque id of the signed-in author, as handed out by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorId(String);

impl AuthorId {
    /// Returns `None` for blank ids
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WishError {
    #[error("Wish not found: {0}")]
    NotFound(String),
    #[error("Draft not found: {0}")]
    DraftNotFound(String),
    #[error("Sign in required")]
    SignInRequired,
    #[error("Draft belongs to another author")]
    NotDraftOwner,
    #[error("Wish is not ready to publish: {0}")]
    NotReady(BlockReason),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
