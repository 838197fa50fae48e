//! Catalog of templates offered by the wizard's "pick the vibe" step.

use once_cell::sync::Lazy;
use shared::TemplateInfo;
use std::sync::Arc;

use super::template_dispatch::{dedicated_variant, is_cross_occasion};

static STANDARD_CATALOG: Lazy<Arc<TemplateCatalog>> = Lazy::new(|| {
    Arc::new(TemplateCatalog::new(vec![
        TemplateEntry::new("birthday-1", "Soft Birthday", "Pastels & Balloons"),
        TemplateEntry::new("anniversary-1", "Deep Love", "Elegant & Moody"),
        TemplateEntry::new("constellation", "Memory Constellation", "Emotionally Nuclear"),
        TemplateEntry::new("soundtrack", "Soundtrack of You", "Spotify Wrapped Energy"),
        TemplateEntry::new("time-capsule", "Time Capsule", "Delayed Reveal"),
        TemplateEntry::new("playable-wish", "Playable Wish", "Mini Game Greeting"),
        TemplateEntry::new("found-footage", "Found Footage", "Cinematic / VHS"),
    ]))
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl TemplateEntry {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    /// True when the viewer has a renderer built for this template
    pub fn is_implemented(&self) -> bool {
        dedicated_variant(&self.id).is_some()
    }

    pub fn is_multi_step(&self) -> bool {
        is_cross_occasion(&self.id)
    }

    /// Prompt handed to the fallback renderer for unimplemented templates
    pub fn fallback_prompt(&self) -> String {
        format!("{}: {}", self.name, self.description)
    }

    pub fn to_info(&self) -> TemplateInfo {
        TemplateInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            implemented: self.is_implemented(),
            multi_step: self.is_multi_step(),
        }
    }
}

/// Ordered list of selectable templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    entries: Vec<TemplateEntry>,
}

impl TemplateCatalog {
    pub fn new(entries: Vec<TemplateEntry>) -> Self {
        Self { entries }
    }

    /// The catalog shipped with the application
    pub fn standard() -> Arc<TemplateCatalog> {
        STANDARD_CATALOG.clone()
    }

    pub fn find(&self, template_id: &str) -> Option<&TemplateEntry> {
        self.entries.iter().find(|entry| entry.id == template_id)
    }

    pub fn to_infos(&self) -> Vec<TemplateInfo> {
        self.entries.iter().map(TemplateEntry::to_info).collect()
    }
}
