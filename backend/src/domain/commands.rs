//! Domain-level query and result types.
//! These are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps them to the DTOs defined
//! in the `shared` crate.

pub mod wishes {
    use crate::domain::models::wish::DomainWish;
    use shared::{CapsuleStatus, OccasionConfig, TemplateVariant};

    /// Everything resolved for viewing a stored wish.
    #[derive(Debug, Clone)]
    pub struct WishView {
        pub wish: DomainWish,
        pub variant: TemplateVariant,
        pub occasion_config: &'static OccasionConfig,
        /// Present for time-capsule wishes only
        pub capsule: Option<CapsuleStatus>,
    }
}

pub mod drafts {
    use crate::domain::wish_draft::{DraftEffect, DraftState};

    /// Result of creating, reading or driving a draft session.
    #[derive(Debug, Clone)]
    pub struct DraftOutcome {
        pub draft_id: String,
        pub state: DraftState,
        pub effect: DraftEffect,
    }
}
