use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Celebratory category of a wish. Drives the cosmetic theme only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    #[default]
    Birthday,
    Anniversary,
    Wedding,
    Custom,
}

impl Occasion {
    pub const ALL: [Occasion; 4] = [
        Occasion::Birthday,
        Occasion::Anniversary,
        Occasion::Wedding,
        Occasion::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Birthday => "birthday",
            Occasion::Anniversary => "anniversary",
            Occasion::Wedding => "wedding",
            Occasion::Custom => "custom",
        }
    }

    /// Parse a stored occasion string. Anything unrecognized is `Custom`.
    pub fn parse_lossy(value: &str) -> Self {
        match value {
            "birthday" => Occasion::Birthday,
            "anniversary" => Occasion::Anniversary,
            "wedding" => Occasion::Wedding,
            _ => Occasion::Custom,
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation a stored wish is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateVariant {
    Birthday,
    Anniversary,
    Constellation,
    Soundtrack,
    TimeCapsule,
    PlayableWish,
    FoundFootage,
    /// Best-effort fallback, also used for templates without a dedicated renderer
    Custom,
}

/// One clip of a found-footage wish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Clip {
    pub caption: String,
    /// Free-form date label (usually `YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,
}

/// The in-progress wish as the creation wizard edits it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WishDraft {
    pub recipient_name: String,
    pub occasion: Occasion,
    pub message: String,
    pub template_id: String,
    /// Name and description of a template that has no dedicated renderer yet
    pub custom_theme_prompt: String,
    pub memories: Vec<String>,
    pub tracks: Vec<String>,
    pub unlock_date: String,
    pub teaser_message: String,
    pub game_target: u8,
    pub clips: Vec<Clip>,
}

impl Default for WishDraft {
    fn default() -> Self {
        Self {
            recipient_name: String::new(),
            occasion: Occasion::Birthday,
            message: String::new(),
            template_id: "birthday-1".to_string(),
            custom_theme_prompt: String::new(),
            memories: Vec::new(),
            tracks: Vec::new(),
            unlock_date: String::new(),
            teaser_message: String::new(),
            game_target: 10,
            clips: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WishStatus {
    #[default]
    Published,
}

/// Persisted wish document as it lives in the `wishes` collection.
///
/// Every field defaults so documents written by older clients still load.
/// A field that is null or of an unexpected type (an old timestamp object in
/// `createdAt`, a `gameTarget` out of range) reads as its default instead of
/// failing the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PublishedWish {
    #[serde(deserialize_with = "lenient")]
    pub recipient_name: String,
    /// Kept as a raw string: stored documents may carry values this build doesn't know
    #[serde(deserialize_with = "lenient")]
    pub occasion: String,
    #[serde(deserialize_with = "lenient")]
    pub message: String,
    #[serde(deserialize_with = "lenient")]
    pub template_id: String,
    #[serde(deserialize_with = "lenient")]
    pub custom_theme_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub memories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub tracks: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub unlock_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub teaser_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub game_target: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub clips: Option<Vec<Clip>>,
    #[serde(alias = "userId", deserialize_with = "lenient")]
    pub author_id: String,
    /// RFC 3339 timestamp
    #[serde(deserialize_with = "lenient")]
    pub created_at: String,
    #[serde(deserialize_with = "lenient")]
    pub status: WishStatus,
}

/// Read a stored field, falling back to its default when it is null or has
/// the wrong type
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasterEggType {
    Confetti,
    ConfettiGold,
    EmojiRain,
    Sparkle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EasterEggTrigger {
    #[serde(rename = "onOpen")]
    OnOpen,
    #[serde(rename = "onReveal")]
    OnReveal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasterEgg {
    #[serde(rename = "type")]
    pub kind: EasterEggType,
    pub trigger: EasterEggTrigger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Microcopy {
    pub heading: String,
    pub subtitle: String,
    pub name_placeholder: String,
    pub message_placeholder: String,
    pub cta_publish: String,
    pub loading_emoji: String,
    pub footer: String,
    pub error_emoji: String,
    pub error_message: String,
}

/// Preset message suggestion shown while writing the message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibeStarter {
    pub label: String,
    pub text: String,
}

/// Cosmetic configuration of an occasion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccasionConfig {
    pub label: String,
    pub emojis: Vec<String>,
    pub gradient: String,
    pub blob_colors: [String; 2],
    pub primary_hue: u16,
    pub microcopy: Microcopy,
    pub easter_egg: EasterEgg,
    pub vibe_starters: Vec<VibeStarter>,
}

/// Entry of the template picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Whether a dedicated renderer exists for this template
    pub implemented: bool,
    /// Whether the wizard shows an extra details step for this template
    pub multi_step: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateInfo>,
}

/// Lifecycle of a draft session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum DraftPhase {
    Editing,
    Publishing,
    #[serde(rename_all = "camelCase")]
    Published { wish_id: String },
}

/// What the wizard UI needs to render the current step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    pub draft_id: String,
    pub step: u8,
    pub total_steps: u8,
    pub phase: DraftPhase,
    pub draft: WishDraft,
    /// Whether the "next" action is enabled on the current step
    pub can_advance: bool,
}

/// UI event sent to a draft session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DraftEventRequest {
    SetRecipientName { value: String },
    SetOccasion { occasion: Occasion },
    SetMessage { value: String },
    ApplyVibeStarter { index: usize },
    #[serde(rename_all = "camelCase")]
    SelectTemplate { template_id: String },
    Next,
    Back,
    AddMemory,
    EditMemory { index: usize, value: String },
    RemoveMemory { index: usize },
    AddTrack,
    EditTrack { index: usize, value: String },
    RemoveTrack { index: usize },
    AddClip,
    EditClipCaption { index: usize, value: String },
    EditClipDate { index: usize, value: String },
    RemoveClip { index: usize },
    SetUnlockDate { value: String },
    SetTeaserMessage { value: String },
    SetGameTarget { target: u8 },
}

/// Outbound effect of applying a draft event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DraftEffectResponse {
    None,
    Blocked { reason: String },
    OccasionReconfigured { config: OccasionConfig },
    PublishRequested,
    #[serde(rename_all = "camelCase")]
    NavigateToWish { wish_id: String, redirect: String },
    PublishFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEventResponse {
    pub snapshot: DraftSnapshot,
    pub effect: DraftEffectResponse,
}

/// Opens a draft session, optionally pre-filled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CreateDraftRequest {
    pub draft: Option<WishDraft>,
}

/// Direct publish of a complete draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWishRequest {
    pub draft: WishDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWishResponse {
    pub wish_id: String,
    /// Viewer path for the new wish
    pub redirect: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

/// Lock state of a time-capsule wish at the moment it was viewed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum CapsuleStatus {
    #[serde(rename_all = "camelCase")]
    Locked {
        teaser: String,
        unlocks_at: String,
        remaining: Countdown,
    },
    Unlocked,
}

/// Everything a viewer needs to render a stored wish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishViewResponse {
    pub id: String,
    pub wish: PublishedWish,
    pub variant: TemplateVariant,
    pub occasion_config: OccasionConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capsule: Option<CapsuleStatus>,
}

/// Error body returned by the REST API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    /// Where the client should navigate next, if anywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            redirect: None,
        }
    }

    pub fn with_redirect(error: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            redirect: Some(redirect.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occasion_parse_lossy_falls_back_to_custom() {
        assert_eq!(Occasion::parse_lossy("wedding"), Occasion::Wedding);
        assert_eq!(Occasion::parse_lossy(""), Occasion::Custom);
        assert_eq!(Occasion::parse_lossy("Birthday"), Occasion::Custom);
    }

    #[test]
    fn test_published_wish_accepts_legacy_user_id() {
        let json = r#"{"recipientName":"Sam","occasion":"birthday","userId":"u-1"}"#;
        let wish: PublishedWish = serde_json::from_str(json).unwrap();
        assert_eq!(wish.author_id, "u-1");
        assert_eq!(wish.template_id, "");
        assert_eq!(wish.status, WishStatus::Published);
    }

    #[test]
    fn test_published_wish_tolerates_malformed_fields() {
        let json = r#"{
            "recipientName": "Jo",
            "templateId": null,
            "occasion": "wedding",
            "createdAt": {"seconds": 1700000000, "nanoseconds": 0},
            "gameTarget": 300,
            "memories": "not a list",
            "status": "archived"
        }"#;
        let wish: PublishedWish = serde_json::from_str(json).unwrap();
        assert_eq!(wish.recipient_name, "Jo");
        assert_eq!(wish.template_id, "");
        assert_eq!(wish.occasion, "wedding");
        assert_eq!(wish.created_at, "");
        assert_eq!(wish.game_target, None);
        assert_eq!(wish.memories, None);
        assert_eq!(wish.status, WishStatus::Published);
    }

    #[test]
    fn test_published_wish_omits_absent_payloads() {
        let wish = PublishedWish {
            recipient_name: "Sam".to_string(),
            template_id: "playable-wish".to_string(),
            game_target: Some(15),
            ..Default::default()
        };
        let value = serde_json::to_value(&wish).unwrap();
        assert_eq!(value["gameTarget"], 15);
        assert!(value.get("memories").is_none());
        assert_eq!(value["status"], "published");
    }

    #[test]
    fn test_draft_event_request_wire_format() {
        let json = r#"{"type":"select-template","templateId":"soundtrack"}"#;
        let event: DraftEventRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            DraftEventRequest::SelectTemplate {
                template_id: "soundtrack".to_string()
            }
        );

        let next: DraftEventRequest = serde_json::from_str(r#"{"type":"next"}"#).unwrap();
        assert_eq!(next, DraftEventRequest::Next);
    }

    #[test]
    fn test_template_variant_serializes_kebab_case() {
        let value = serde_json::to_value(TemplateVariant::TimeCapsule).unwrap();
        assert_eq!(value, "time-capsule");
    }
}
