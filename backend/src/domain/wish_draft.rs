//! # Wish Draft State Machine
//!
//! Drives the wish creation wizard. The wizard has three steps, plus a
//! fourth "details" step for templates that carry extra content:
//!
//! 1. recipient name and occasion
//! 2. message (optionally from a vibe starter)
//! 3. template selection
//! 4. template details (memories, tracks, unlock date, game target or clips)
//!
//! State is an explicit value and every change goes through the pure
//! [`transition`] function. Guards never raise: a disallowed event leaves the
//! state untouched and yields [`DraftEffect::Blocked`].
//!
//! Memories, tracks and clips are plain index-addressed lists. Entries have
//! no identity beyond their position, so removing one shifts every later
//! entry down by one.
//!
//! Publishing is a sub-state. While a publish is in flight every event other
//! than its outcome is blocked, which keeps a draft to at most one external
//! write at a time.

use shared::{Clip, DraftPhase, Occasion, OccasionConfig, WishDraft};
use std::sync::Arc;

use super::models::wish::{WishPayload, WishSubmission};
use super::occasion_config::config_for;
use super::template_catalog::TemplateCatalog;
use super::template_dispatch::is_cross_occasion;

pub const MEMORY_LIMIT: usize = 20;
pub const TRACK_LIMIT: usize = 10;
pub const CLIP_LIMIT: usize = 10;

pub const MEMORY_MINIMUM: usize = 3;
pub const TRACK_MINIMUM: usize = 3;
pub const CLIP_MINIMUM: usize = 2;

pub const MEMORY_MAX_CHARS: usize = 120;
pub const TRACK_MAX_CHARS: usize = 80;
pub const CAPTION_MAX_CHARS: usize = 100;
pub const TEASER_MAX_CHARS: usize = 200;

pub const GAME_TARGETS: [u8; 4] = [5, 10, 15, 20];

const FIRST_STEP: u8 = 1;
const MESSAGE_STEP: u8 = 2;
const TEMPLATE_STEP: u8 = 3;
const DETAILS_STEP: u8 = 4;

/// Why an event was not allowed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockReason {
    #[error("recipient name is required")]
    MissingRecipientName,
    #[error("message is required")]
    MissingMessage,
    #[error("{list}: {found} filled in, {min} to {max} required")]
    EntryCount {
        list: &'static str,
        found: usize,
        min: usize,
        max: usize,
    },
    #[error("unlock date is required")]
    MissingUnlockDate,
    #[error("game target must be one of 5, 10, 15 or 20 (got {0})")]
    InvalidGameTarget(u8),
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
    #[error("{list} already holds the maximum of {limit} entries")]
    ListFull { list: &'static str, limit: usize },
    #[error("{list} has no entry at position {index}")]
    NoSuchEntry { list: &'static str, index: usize },
    #[error("no vibe starter at position {0}")]
    NoSuchVibeStarter(usize),
    #[error("this field is not editable on step {0}")]
    WrongStep(u8),
    #[error("this field only applies to the {0} template")]
    WrongTemplate(&'static str),
    #[error("already on the first step")]
    AtFirstStep,
    #[error("there are steps left before publishing")]
    StepsRemaining,
    #[error("a publish is already in flight")]
    PublishInFlight,
    #[error("no publish is in flight")]
    NoPublishInFlight,
    #[error("the wish has already been published")]
    AlreadyPublished,
}

/// Input to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEvent {
    SetRecipientName(String),
    SetOccasion(Occasion),
    SetMessage(String),
    ApplyVibeStarter(usize),
    SelectTemplate(String),
    Next,
    Back,
    Submit,
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
    SetUnlockDate(String),
    SetTeaserMessage(String),
    SetGameTarget(u8),
    PublishSucceeded { wish_id: String },
    PublishFailed { reason: String },
}

/// Outbound signal produced by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEffect {
    None,
    Blocked(BlockReason),
    /// The occasion changed and the UI should re-theme with this config
    OccasionReconfigured(&'static OccasionConfig),
    /// The caller must hand this submission to the publisher and report back
    RequestPublish(WishSubmission),
    NavigateToWish { wish_id: String },
    PublishFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftState {
    step: u8,
    phase: DraftPhase,
    draft: WishDraft,
}

impl Default for DraftState {
    fn default() -> Self {
        Self::with_draft(WishDraft::default())
    }
}

impl DraftState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the wizard on step 1 with pre-filled data
    pub fn with_draft(draft: WishDraft) -> Self {
        Self {
            step: FIRST_STEP,
            phase: DraftPhase::Editing,
            draft,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn phase(&self) -> &DraftPhase {
        &self.phase
    }

    pub fn draft(&self) -> &WishDraft {
        &self.draft
    }

    pub fn is_publishing(&self) -> bool {
        self.phase == DraftPhase::Publishing
    }

    pub fn total_steps(&self) -> u8 {
        if is_cross_occasion(&self.draft.template_id) {
            DETAILS_STEP
        } else {
            TEMPLATE_STEP
        }
    }

    /// Whether "next" on the current step would go through
    pub fn can_advance(&self) -> bool {
        if self.phase != DraftPhase::Editing {
            return false;
        }
        match self.step {
            FIRST_STEP => has_text(&self.draft.recipient_name),
            MESSAGE_STEP => has_text(&self.draft.message),
            TEMPLATE_STEP if is_cross_occasion(&self.draft.template_id) => true,
            _ => publish_readiness(&self.draft).is_ok(),
        }
    }

    fn require_step(&self, step: u8) -> Result<(), BlockReason> {
        if self.step == step {
            Ok(())
        } else {
            Err(BlockReason::WrongStep(self.step))
        }
    }

    fn require_details_for(&self, template_id: &'static str) -> Result<(), BlockReason> {
        self.require_step(DETAILS_STEP)?;
        if self.draft.template_id == template_id {
            Ok(())
        } else {
            Err(BlockReason::WrongTemplate(template_id))
        }
    }

    fn advance(&mut self) -> Result<DraftEffect, BlockReason> {
        match self.step {
            FIRST_STEP => {
                if !has_text(&self.draft.recipient_name) {
                    return Err(BlockReason::MissingRecipientName);
                }
                self.step = MESSAGE_STEP;
                Ok(DraftEffect::None)
            }
            MESSAGE_STEP => {
                if !has_text(&self.draft.message) {
                    return Err(BlockReason::MissingMessage);
                }
                self.step = TEMPLATE_STEP;
                Ok(DraftEffect::None)
            }
            TEMPLATE_STEP if is_cross_occasion(&self.draft.template_id) => {
                self.step = DETAILS_STEP;
                Ok(DraftEffect::None)
            }
            _ => self.request_publish(),
        }
    }

    fn retreat(&mut self) -> Result<DraftEffect, BlockReason> {
        if self.step <= FIRST_STEP {
            return Err(BlockReason::AtFirstStep);
        }
        self.step -= 1;
        Ok(DraftEffect::None)
    }

    fn submit(&mut self) -> Result<DraftEffect, BlockReason> {
        let details_pending =
            self.step == TEMPLATE_STEP && is_cross_occasion(&self.draft.template_id);
        if self.step < TEMPLATE_STEP || details_pending {
            return Err(BlockReason::StepsRemaining);
        }
        self.request_publish()
    }

    fn request_publish(&mut self) -> Result<DraftEffect, BlockReason> {
        publish_readiness(&self.draft)?;
        self.phase = DraftPhase::Publishing;
        Ok(DraftEffect::RequestPublish(shape_submission(&self.draft)))
    }

    fn select_template(
        &mut self,
        template_id: &str,
        catalog: &TemplateCatalog,
    ) -> Result<DraftEffect, BlockReason> {
        self.require_step(TEMPLATE_STEP)?;
        let entry = catalog
            .find(template_id)
            .ok_or_else(|| BlockReason::UnknownTemplate(template_id.to_string()))?;

        self.draft.custom_theme_prompt = if entry.is_implemented() {
            String::new()
        } else {
            entry.fallback_prompt()
        };
        self.draft.template_id = entry.id.clone();
        Ok(DraftEffect::None)
    }

    /// Apply an event while in the editing phase. Every guard runs before any
    /// mutation, so an `Err` leaves the state as it was.
    fn apply_edit(
        &mut self,
        event: DraftEvent,
        catalog: &TemplateCatalog,
    ) -> Result<DraftEffect, BlockReason> {
        match event {
            DraftEvent::SetRecipientName(value) => {
                self.require_step(FIRST_STEP)?;
                self.draft.recipient_name = value;
                Ok(DraftEffect::None)
            }
            DraftEvent::SetOccasion(occasion) => {
                self.require_step(FIRST_STEP)?;
                self.draft.occasion = occasion;
                Ok(DraftEffect::OccasionReconfigured(config_for(occasion)))
            }
            DraftEvent::SetMessage(value) => {
                self.require_step(MESSAGE_STEP)?;
                self.draft.message = value;
                Ok(DraftEffect::None)
            }
            DraftEvent::ApplyVibeStarter(index) => {
                self.require_step(MESSAGE_STEP)?;
                let starter = config_for(self.draft.occasion)
                    .vibe_starters
                    .get(index)
                    .ok_or(BlockReason::NoSuchVibeStarter(index))?;
                self.draft.message = starter.text.clone();
                Ok(DraftEffect::None)
            }
            DraftEvent::SelectTemplate(template_id) => self.select_template(&template_id, catalog),
            DraftEvent::Next => self.advance(),
            DraftEvent::Back => self.retreat(),
            DraftEvent::Submit => self.submit(),

            DraftEvent::AddMemory => {
                self.require_details_for("constellation")?;
                push_entry(&mut self.draft.memories, String::new(), "memories", MEMORY_LIMIT)
            }
            DraftEvent::EditMemory { index, value } => {
                self.require_details_for("constellation")?;
                let value = truncate_chars(value, MEMORY_MAX_CHARS);
                set_entry(&mut self.draft.memories, index, "memories", |entry| *entry = value)
            }
            DraftEvent::RemoveMemory { index } => {
                self.require_details_for("constellation")?;
                remove_entry(&mut self.draft.memories, index, "memories")
            }

            DraftEvent::AddTrack => {
                self.require_details_for("soundtrack")?;
                push_entry(&mut self.draft.tracks, String::new(), "tracks", TRACK_LIMIT)
            }
            DraftEvent::EditTrack { index, value } => {
                self.require_details_for("soundtrack")?;
                let value = truncate_chars(value, TRACK_MAX_CHARS);
                set_entry(&mut self.draft.tracks, index, "tracks", |entry| *entry = value)
            }
            DraftEvent::RemoveTrack { index } => {
                self.require_details_for("soundtrack")?;
                remove_entry(&mut self.draft.tracks, index, "tracks")
            }

            DraftEvent::AddClip => {
                self.require_details_for("found-footage")?;
                push_entry(&mut self.draft.clips, Clip::default(), "clips", CLIP_LIMIT)
            }
            DraftEvent::EditClipCaption { index, value } => {
                self.require_details_for("found-footage")?;
                let value = truncate_chars(value, CAPTION_MAX_CHARS);
                set_entry(&mut self.draft.clips, index, "clips", |clip| clip.caption = value)
            }
            DraftEvent::EditClipDate { index, value } => {
                self.require_details_for("found-footage")?;
                set_entry(&mut self.draft.clips, index, "clips", |clip| clip.date = value)
            }
            DraftEvent::RemoveClip { index } => {
                self.require_details_for("found-footage")?;
                remove_entry(&mut self.draft.clips, index, "clips")
            }

            DraftEvent::SetUnlockDate(value) => {
                self.require_details_for("time-capsule")?;
                self.draft.unlock_date = value;
                Ok(DraftEffect::None)
            }
            DraftEvent::SetTeaserMessage(value) => {
                self.require_details_for("time-capsule")?;
                self.draft.teaser_message = truncate_chars(value, TEASER_MAX_CHARS);
                Ok(DraftEffect::None)
            }
            DraftEvent::SetGameTarget(target) => {
                self.require_details_for("playable-wish")?;
                if !GAME_TARGETS.contains(&target) {
                    return Err(BlockReason::InvalidGameTarget(target));
                }
                self.draft.game_target = target;
                Ok(DraftEffect::None)
            }

            DraftEvent::PublishSucceeded { .. } | DraftEvent::PublishFailed { .. } => {
                Err(BlockReason::NoPublishInFlight)
            }
        }
    }
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: DraftState,
    pub effect: DraftEffect,
}

/// The state machine's transition function
pub fn transition(state: DraftState, event: DraftEvent, catalog: &TemplateCatalog) -> Transition {
    match state.phase.clone() {
        DraftPhase::Published { .. } => blocked(state, BlockReason::AlreadyPublished),
        DraftPhase::Publishing => match event {
            DraftEvent::PublishSucceeded { wish_id } => Transition {
                state: DraftState {
                    phase: DraftPhase::Published {
                        wish_id: wish_id.clone(),
                    },
                    ..state
                },
                effect: DraftEffect::NavigateToWish { wish_id },
            },
            DraftEvent::PublishFailed { reason } => Transition {
                state: DraftState {
                    phase: DraftPhase::Editing,
                    ..state
                },
                effect: DraftEffect::PublishFailed { reason },
            },
            _ => blocked(state, BlockReason::PublishInFlight),
        },
        DraftPhase::Editing => {
            let mut next = state.clone();
            match next.apply_edit(event, catalog) {
                Ok(effect) => Transition {
                    state: next,
                    effect,
                },
                Err(reason) => blocked(state, reason),
            }
        }
    }
}

fn blocked(state: DraftState, reason: BlockReason) -> Transition {
    Transition {
        state,
        effect: DraftEffect::Blocked(reason),
    }
}

/// Check everything a publish needs: name, message and the template payload
pub fn publish_readiness(draft: &WishDraft) -> Result<(), BlockReason> {
    if !has_text(&draft.recipient_name) {
        return Err(BlockReason::MissingRecipientName);
    }
    if !has_text(&draft.message) {
        return Err(BlockReason::MissingMessage);
    }

    match draft.template_id.as_str() {
        "constellation" => check_count(
            "memories",
            count_filled(draft.memories.iter().map(String::as_str)),
            MEMORY_MINIMUM,
            MEMORY_LIMIT,
        ),
        "soundtrack" => check_count(
            "tracks",
            count_filled(draft.tracks.iter().map(String::as_str)),
            TRACK_MINIMUM,
            TRACK_LIMIT,
        ),
        "time-capsule" if !has_text(&draft.unlock_date) => Err(BlockReason::MissingUnlockDate),
        "playable-wish" if !GAME_TARGETS.contains(&draft.game_target) => {
            Err(BlockReason::InvalidGameTarget(draft.game_target))
        }
        "found-footage" => check_count(
            "clips",
            count_filled(draft.clips.iter().map(|clip| clip.caption.as_str())),
            CLIP_MINIMUM,
            CLIP_LIMIT,
        ),
        _ => Ok(()),
    }
}

/// Shape a draft for persistence: trim text, drop blank list entries and keep
/// only the payload of the selected template
pub fn shape_submission(draft: &WishDraft) -> WishSubmission {
    let payload = match draft.template_id.as_str() {
        "constellation" => WishPayload::Constellation {
            memories: filled_entries(&draft.memories),
        },
        "soundtrack" => WishPayload::Soundtrack {
            tracks: filled_entries(&draft.tracks),
        },
        "time-capsule" => WishPayload::TimeCapsule {
            unlock_date: draft.unlock_date.trim().to_string(),
            teaser_message: draft.teaser_message.trim().to_string(),
        },
        "playable-wish" => WishPayload::PlayableWish {
            game_target: draft.game_target,
        },
        "found-footage" => WishPayload::FoundFootage {
            clips: draft
                .clips
                .iter()
                .filter(|clip| has_text(&clip.caption))
                .map(|clip| Clip {
                    caption: clip.caption.trim().to_string(),
                    date: clip.date.trim().to_string(),
                })
                .collect(),
        },
        _ => WishPayload::None,
    };

    WishSubmission {
        recipient_name: draft.recipient_name.trim().to_string(),
        occasion: draft.occasion,
        message: draft.message.trim().to_string(),
        template_id: draft.template_id.clone(),
        custom_theme_prompt: draft.custom_theme_prompt.clone(),
        payload,
    }
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

fn count_filled<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.filter(|value| has_text(value)).count()
}

fn filled_entries(values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter(|value| has_text(value))
        .map(|value| value.trim().to_string())
        .collect()
}

fn check_count(list: &'static str, found: usize, min: usize, max: usize) -> Result<(), BlockReason> {
    if (min..=max).contains(&found) {
        Ok(())
    } else {
        Err(BlockReason::EntryCount {
            list,
            found,
            min,
            max,
        })
    }
}

fn truncate_chars(value: String, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value
    } else {
        value.chars().take(max_chars).collect()
    }
}

fn push_entry<T>(
    list: &mut Vec<T>,
    entry: T,
    name: &'static str,
    limit: usize,
) -> Result<DraftEffect, BlockReason> {
    if list.len() >= limit {
        return Err(BlockReason::ListFull { list: name, limit });
    }
    list.push(entry);
    Ok(DraftEffect::None)
}

fn set_entry<T>(
    list: &mut [T],
    index: usize,
    name: &'static str,
    update: impl FnOnce(&mut T),
) -> Result<DraftEffect, BlockReason> {
    let entry = list
        .get_mut(index)
        .ok_or(BlockReason::NoSuchEntry { list: name, index })?;
    update(entry);
    Ok(DraftEffect::None)
}

fn remove_entry<T>(
    list: &mut Vec<T>,
    index: usize,
    name: &'static str,
) -> Result<DraftEffect, BlockReason> {
    if index >= list.len() {
        return Err(BlockReason::NoSuchEntry { list: name, index });
    }
    list.remove(index);
    Ok(DraftEffect::None)
}

/// Stateful wrapper around [`transition`] for a single draft
#[derive(Debug, Clone)]
pub struct WishDraftMachine {
    state: DraftState,
    catalog: Arc<TemplateCatalog>,
}

impl WishDraftMachine {
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self {
            state: DraftState::new(),
            catalog,
        }
    }

    pub fn with_state(state: DraftState, catalog: Arc<TemplateCatalog>) -> Self {
        Self { state, catalog }
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn apply(&mut self, event: DraftEvent) -> DraftEffect {
        let current = std::mem::take(&mut self.state);
        let Transition { state, effect } = transition(current, event, &self.catalog);
        self.state = state;
        effect
    }
}
