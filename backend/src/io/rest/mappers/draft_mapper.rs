use shared::{DraftEffectResponse, DraftEventRequest, DraftEventResponse, DraftSnapshot};

use crate::domain::commands::drafts::DraftOutcome;
use crate::domain::wish_draft::{DraftEffect, DraftEvent, DraftState};
use crate::io::rest::mappers::wish_mapper::WishMapper;

pub struct DraftMapper;

impl DraftMapper {
    /// Convert a UI event DTO to the state machine's event
    pub fn to_domain_event(request: DraftEventRequest) -> DraftEvent {
        match request {
            DraftEventRequest::SetRecipientName { value } => DraftEvent::SetRecipientName(value),
            DraftEventRequest::SetOccasion { occasion } => DraftEvent::SetOccasion(occasion),
            DraftEventRequest::SetMessage { value } => DraftEvent::SetMessage(value),
            DraftEventRequest::ApplyVibeStarter { index } => DraftEvent::ApplyVibeStarter(index),
            DraftEventRequest::SelectTemplate { template_id } => {
                DraftEvent::SelectTemplate(template_id)
            }
            DraftEventRequest::Next => DraftEvent::Next,
            DraftEventRequest::Back => DraftEvent::Back,
            DraftEventRequest::AddMemory => DraftEvent::AddMemory,
            DraftEventRequest::EditMemory { index, value } => DraftEvent::EditMemory { index, value },
            DraftEventRequest::RemoveMemory { index } => DraftEvent::RemoveMemory { index },
            DraftEventRequest::AddTrack => DraftEvent::AddTrack,
            DraftEventRequest::EditTrack { index, value } => DraftEvent::EditTrack { index, value },
            DraftEventRequest::RemoveTrack { index } => DraftEvent::RemoveTrack { index },
            DraftEventRequest::AddClip => DraftEvent::AddClip,
            DraftEventRequest::EditClipCaption { index, value } => {
                DraftEvent::EditClipCaption { index, value }
            }
            DraftEventRequest::EditClipDate { index, value } => {
                DraftEvent::EditClipDate { index, value }
            }
            DraftEventRequest::RemoveClip { index } => DraftEvent::RemoveClip { index },
            DraftEventRequest::SetUnlockDate { value } => DraftEvent::SetUnlockDate(value),
            DraftEventRequest::SetTeaserMessage { value } => DraftEvent::SetTeaserMessage(value),
            DraftEventRequest::SetGameTarget { target } => DraftEvent::SetGameTarget(target),
        }
    }

    pub fn to_snapshot(draft_id: &str, state: &DraftState) -> DraftSnapshot {
        DraftSnapshot {
            draft_id: draft_id.to_string(),
            step: state.step(),
            total_steps: state.total_steps(),
            phase: state.phase().clone(),
            draft: state.draft().clone(),
            can_advance: state.can_advance(),
        }
    }

    pub fn to_effect_response(effect: DraftEffect) -> DraftEffectResponse {
        match effect {
            DraftEffect::None => DraftEffectResponse::None,
            DraftEffect::Blocked(reason) => DraftEffectResponse::Blocked {
                reason: reason.to_string(),
            },
            DraftEffect::OccasionReconfigured(config) => DraftEffectResponse::OccasionReconfigured {
                config: config.clone(),
            },
            // Only seen if a publish request escapes the session service
            DraftEffect::RequestPublish(_) => DraftEffectResponse::PublishRequested,
            DraftEffect::NavigateToWish { wish_id } => DraftEffectResponse::NavigateToWish {
                redirect: WishMapper::view_path(&wish_id),
                wish_id,
            },
            DraftEffect::PublishFailed { reason } => DraftEffectResponse::PublishFailed { reason },
        }
    }

    pub fn to_event_response(outcome: DraftOutcome) -> DraftEventResponse {
        DraftEventResponse {
            snapshot: Self::to_snapshot(&outcome.draft_id, &outcome.state),
            effect: Self::to_effect_response(outcome.effect),
        }
    }
}
