//! Template dispatch for stored wishes.
//!
//! Picks exactly one presentation variant for a persisted wish from its
//! `templateId` and `occasion` fields. Dispatch is total: documents with
//! missing, empty or unknown values always land on a variant, falling back
//! to `Custom`.
//!
//! Two priority orders exist. `TemplateFirst` is authoritative for new
//! documents. `Legacy` is the superseded occasion-first order and can be
//! selected through configuration.

use serde::{Deserialize, Serialize};
use shared::TemplateVariant;

/// Templates that render the same way regardless of occasion.
/// These are also the templates that need an extra details step in the wizard.
pub const CROSS_OCCASION_TEMPLATES: [&str; 5] = [
    "constellation",
    "soundtrack",
    "time-capsule",
    "playable-wish",
    "found-footage",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchOrder {
    #[default]
    TemplateFirst,
    Legacy,
}

/// The two stored fields dispatch looks at. Absent values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredTemplateFields {
    pub template_id: String,
    pub occasion: String,
}

/// Variant of a cross-occasion template id
pub fn cross_occasion_variant(template_id: &str) -> Option<TemplateVariant> {
    match template_id {
        "constellation" => Some(TemplateVariant::Constellation),
        "soundtrack" => Some(TemplateVariant::Soundtrack),
        "time-capsule" => Some(TemplateVariant::TimeCapsule),
        "playable-wish" => Some(TemplateVariant::PlayableWish),
        "found-footage" => Some(TemplateVariant::FoundFootage),
        _ => None,
    }
}

pub fn is_cross_occasion(template_id: &str) -> bool {
    cross_occasion_variant(template_id).is_some()
}

/// Variant built specifically for this template id, if there is one.
/// Templates without a dedicated variant are rendered by the `Custom` fallback.
pub fn dedicated_variant(template_id: &str) -> Option<TemplateVariant> {
    match template_id {
        "birthday-1" => Some(TemplateVariant::Birthday),
        "anniversary-1" => Some(TemplateVariant::Anniversary),
        other => cross_occasion_variant(other),
    }
}

/// Template-first dispatch: cross-occasion template, then occasion, then fallback
pub fn dispatch(fields: &StoredTemplateFields) -> TemplateVariant {
    if let Some(variant) = cross_occasion_variant(&fields.template_id) {
        return variant;
    }

    match fields.occasion.as_str() {
        "birthday" => TemplateVariant::Birthday,
        // Weddings reuse the anniversary presentation.
        "anniversary" | "wedding" => TemplateVariant::Anniversary,
        _ => TemplateVariant::Custom,
    }
}

/// Occasion-first dispatch used before cross-occasion templates took priority
pub fn dispatch_legacy(fields: &StoredTemplateFields) -> TemplateVariant {
    if fields.occasion == "anniversary" || fields.template_id.contains("anniversary") {
        return TemplateVariant::Anniversary;
    }

    if fields.template_id == "birthday-1" {
        return TemplateVariant::Birthday;
    }

    cross_occasion_variant(&fields.template_id).unwrap_or(TemplateVariant::Custom)
}

pub fn dispatch_with(order: DispatchOrder, fields: &StoredTemplateFields) -> TemplateVariant {
    match order {
        DispatchOrder::TemplateFirst => dispatch(fields),
        DispatchOrder::Legacy => dispatch_legacy(fields),
    }
}
