//! # Domain Module
//!
//! Contains the business rules for authoring, publishing and viewing wishes.
//! Nothing in here knows about HTTP. Storage is reached only through the
//! repository in [`crate::storage`].
//!
//! ## Module Organization
//!
//! - **wish_draft**: the wizard state machine and publish readiness rules
//! - **template_catalog**: the selectable templates and their metadata
//! - **template_dispatch**: stored template id + occasion to presentation variant
//! - **occasion_config**: the static per-occasion theme table
//! - **time_capsule**: lock state and countdown for time-capsule wishes
//! - **wish_service**: publishing and viewing stored wishes
//! - **draft_session_service**: per-author in-memory draft sessions
//!
//! ## Business Rules
//!
//! - A wish needs a recipient name and a message
//! - Multi-step templates also need their payload (memories, tracks, clips,
//!   unlock date or game target) before they can be published
//! - A draft performs at most one publish at a time
//! - Published wishes are immutable
//! - Unknown occasions and template ids always resolve to something renderable

pub mod commands;
pub mod draft_session_service;
pub mod models;
pub mod occasion_config;
pub mod template_catalog;
pub mod template_dispatch;
pub mod time_capsule;
pub mod wish_draft;
pub mod wish_service;

pub use draft_session_service::DraftSessionService;
pub use template_catalog::TemplateCatalog;
pub use wish_service::{WishPublisher, WishService};
