//! In-memory draft sessions.
//!
//! Each session owns one [`WishDraftMachine`] and belongs to the author who
//! created it. Events are applied under the session lock. When an event
//! requests a publish, the write to the [`WishPublisher`] happens outside the
//! lock and its outcome is fed back as the next event. Because the machine is
//! already `Publishing` by then, a concurrent submit on the same draft is
//! blocked instead of writing a second wish.
//!
//! Sessions are short-lived. A session is dropped once its wish is published.
//! Idle sessions expire and are swept whenever a new draft is opened. Each
//! author keeps at most a fixed number of open drafts, and opening one more
//! evicts that author's least recently used draft. Sessions with a publish in
//! flight are never swept or evicted.

use anyhow::anyhow;
use shared::{DraftPhase, WishDraft};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::commands::drafts::DraftOutcome;
use super::models::wish::{AuthorId, WishError};
use super::template_catalog::TemplateCatalog;
use super::wish_draft::{DraftEffect, DraftEvent, DraftState, WishDraftMachine};
use super::wish_service::WishPublisher;

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);
pub const DEFAULT_DRAFTS_PER_AUTHOR: usize = 10;

struct DraftSession {
    author: AuthorId,
    machine: WishDraftMachine,
    touched_at: Instant,
    /// Position in usage order, higher is more recent
    last_used: u64,
}

impl DraftSession {
    fn is_publishing(&self) -> bool {
        self.machine.state().is_publishing()
    }
}

#[derive(Default)]
struct SessionTable {
    sessions: HashMap<String, DraftSession>,
    ticks: u64,
}

impl SessionTable {
    fn tick(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }

    /// The author's session, marked as just used
    fn touch(&mut self, author: &AuthorId, draft_id: &str) -> Result<&mut DraftSession, WishError> {
        let tick = self.tick();
        let session = self
            .sessions
            .get_mut(draft_id)
            .ok_or_else(|| WishError::DraftNotFound(draft_id.to_string()))?;
        if &session.author != author {
            warn!("Author {} tried to access draft {}", author, draft_id);
            return Err(WishError::NotDraftOwner);
        }
        session.touched_at = Instant::now();
        session.last_used = tick;
        Ok(session)
    }

    /// Drop sessions idle for at least `idle_ttl`
    fn sweep_idle(&mut self, idle_ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.is_publishing() || session.touched_at.elapsed() < idle_ttl);
        before - self.sessions.len()
    }

    /// Make room for one more draft of `author` within `limit`
    fn evict_over_limit(&mut self, author: &AuthorId, limit: usize) -> Vec<String> {
        let open = self
            .sessions
            .values()
            .filter(|session| &session.author == author)
            .count();
        let excess = (open + 1).saturating_sub(limit.max(1));

        let mut candidates: Vec<(u64, String)> = self
            .sessions
            .iter()
            .filter(|(_, session)| &session.author == author && !session.is_publishing())
            .map(|(id, session)| (session.last_used, id.clone()))
            .collect();
        candidates.sort();

        candidates
            .into_iter()
            .take(excess)
            .map(|(_, id)| {
                self.sessions.remove(&id);
                id
            })
            .collect()
    }
}

#[derive(Clone)]
pub struct DraftSessionService {
    table: Arc<Mutex<SessionTable>>,
    catalog: Arc<TemplateCatalog>,
    publisher: Arc<dyn WishPublisher>,
    idle_ttl: Duration,
    drafts_per_author: usize,
}

impl DraftSessionService {
    pub fn new(catalog: Arc<TemplateCatalog>, publisher: Arc<dyn WishPublisher>) -> Self {
        Self {
            table: Arc::new(Mutex::new(SessionTable::default())),
            catalog,
            publisher,
            idle_ttl: DEFAULT_IDLE_TTL,
            drafts_per_author: DEFAULT_DRAFTS_PER_AUTHOR,
        }
    }

    /// Override how long idle sessions live and how many drafts an author may keep open
    pub fn with_limits(mut self, idle_ttl: Duration, drafts_per_author: usize) -> Self {
        self.idle_ttl = idle_ttl;
        self.drafts_per_author = drafts_per_author;
        self
    }

    /// Open a new session on step 1, optionally pre-filled
    pub fn create_draft(
        &self,
        author: &AuthorId,
        initial: Option<WishDraft>,
    ) -> Result<DraftOutcome, WishError> {
        let state = initial.map(DraftState::with_draft).unwrap_or_default();
        let machine = WishDraftMachine::with_state(state.clone(), self.catalog.clone());
        let draft_id = Uuid::new_v4().simple().to_string();

        let mut table = self.lock()?;
        let swept = table.sweep_idle(self.idle_ttl);
        if swept > 0 {
            debug!("Swept {} idle draft sessions", swept);
        }
        for evicted in table.evict_over_limit(author, self.drafts_per_author) {
            info!("Evicted draft {} of author {} to stay within limit", evicted, author);
        }

        let last_used = table.tick();
        table.sessions.insert(
            draft_id.clone(),
            DraftSession {
                author: author.clone(),
                machine,
                touched_at: Instant::now(),
                last_used,
            },
        );
        info!("Opened draft {} for author {}", draft_id, author);

        Ok(DraftOutcome {
            draft_id,
            state,
            effect: DraftEffect::None,
        })
    }

    pub fn get_draft(&self, author: &AuthorId, draft_id: &str) -> Result<DraftOutcome, WishError> {
        let mut table = self.lock()?;
        let session = table.touch(author, draft_id)?;
        Ok(DraftOutcome {
            draft_id: draft_id.to_string(),
            state: session.machine.state().clone(),
            effect: DraftEffect::None,
        })
    }

    /// Apply one event. A publish request is carried out before returning,
    /// so the outcome reports the publish result rather than the request.
    /// A successfully published session is closed.
    pub async fn apply_event(
        &self,
        author: &AuthorId,
        draft_id: &str,
        event: DraftEvent,
    ) -> Result<DraftOutcome, WishError> {
        let (state, effect) = {
            let mut table = self.lock()?;
            let session = table.touch(author, draft_id)?;
            let effect = session.machine.apply(event);
            (session.machine.state().clone(), effect)
        };

        let DraftEffect::RequestPublish(submission) = effect else {
            if let DraftEffect::Blocked(reason) = &effect {
                info!("Draft {} event blocked: {}", draft_id, reason);
            }
            return Ok(DraftOutcome {
                draft_id: draft_id.to_string(),
                state,
                effect,
            });
        };

        let result = self.publisher.publish(author, submission).await;
        let outcome_event = match result {
            Ok(wish_id) => {
                info!("Draft {} published as wish {}", draft_id, wish_id);
                DraftEvent::PublishSucceeded { wish_id }
            }
            Err(e) => {
                error!("Failed to publish draft {}: {:#}", draft_id, e);
                DraftEvent::PublishFailed {
                    reason: e.to_string(),
                }
            }
        };

        let mut table = self.lock()?;
        let session = table.touch(author, draft_id)?;
        let effect = session.machine.apply(outcome_event);
        let state = session.machine.state().clone();
        if matches!(state.phase(), DraftPhase::Published { .. }) {
            table.sessions.remove(draft_id);
            debug!("Closed published draft {}", draft_id);
        }

        Ok(DraftOutcome {
            draft_id: draft_id.to_string(),
            state,
            effect,
        })
    }

    pub async fn submit(&self, author: &AuthorId, draft_id: &str) -> Result<DraftOutcome, WishError> {
        self.apply_event(author, draft_id, DraftEvent::Submit).await
    }

    /// Number of open sessions across all authors
    pub fn open_sessions(&self) -> Result<usize, WishError> {
        Ok(self.lock()?.sessions.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionTable>, WishError> {
        self.table
            .lock()
            .map_err(|_| WishError::Storage(anyhow!("Draft session lock poisoned")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::wish::WishSubmission;
    use crate::domain::wish_draft::BlockReason;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Publisher that counts writes and can be held open until released
    struct RecordingPublisher {
        writes: AtomicUsize,
        gate: Option<Arc<Notify>>,
        fail: bool,
    }

    impl RecordingPublisher {
        fn new() -> Self {
            Self {
                writes: AtomicUsize::new(0),
                gate: None,
                fail: false,
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl WishPublisher for RecordingPublisher {
        async fn publish(
            &self,
            _author: &AuthorId,
            _submission: WishSubmission,
        ) -> anyhow::Result<String> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(anyhow!("store unavailable"));
            }
            let n = self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(format!("wish-{}", n + 1))
        }
    }

    fn author(id: &str) -> AuthorId {
        AuthorId::new(id).unwrap()
    }

    fn ready_draft() -> WishDraft {
        WishDraft {
            recipient_name: "Sam".to_string(),
            message: "Happy birthday!".to_string(),
            ..Default::default()
        }
    }

    /// Drive a pre-filled birthday draft to step 3
    async fn draft_at_last_step(service: &DraftSessionService, owner: &AuthorId) -> String {
        let draft_id = service.create_draft(owner, Some(ready_draft())).unwrap().draft_id;
        service.apply_event(owner, &draft_id, DraftEvent::Next).await.unwrap();
        service.apply_event(owner, &draft_id, DraftEvent::Next).await.unwrap();
        draft_id
    }

    #[tokio::test]
    async fn test_create_and_get_draft() {
        let service = DraftSessionService::new(
            TemplateCatalog::standard(),
            Arc::new(RecordingPublisher::new()),
        );
        let owner = author("uid-1");
        let created = service.create_draft(&owner, None).unwrap();
        assert_eq!(created.state.step(), 1);

        let fetched = service.get_draft(&owner, &created.draft_id).unwrap();
        assert_eq!(fetched.state, created.state);
    }

    #[tokio::test]
    async fn test_sessions_are_private_to_their_author() {
        let service = DraftSessionService::new(
            TemplateCatalog::standard(),
            Arc::new(RecordingPublisher::new()),
        );
        let draft_id = service.create_draft(&author("uid-1"), None).unwrap().draft_id;

        let result = service.get_draft(&author("uid-2"), &draft_id);
        assert!(matches!(result, Err(WishError::NotDraftOwner)));

        let result = service
            .apply_event(&author("uid-2"), &draft_id, DraftEvent::Next)
            .await;
        assert!(matches!(result, Err(WishError::NotDraftOwner)));

        let result = service.get_draft(&author("uid-1"), "missing");
        assert!(matches!(result, Err(WishError::DraftNotFound(_))));
    }

    #[tokio::test]
    async fn test_submit_publishes_and_navigates() {
        let publisher = Arc::new(RecordingPublisher::new());
        let service = DraftSessionService::new(TemplateCatalog::standard(), publisher.clone());
        let owner = author("uid-1");
        let draft_id = draft_at_last_step(&service, &owner).await;

        let outcome = service.submit(&owner, &draft_id).await.unwrap();
        assert_eq!(
            outcome.effect,
            DraftEffect::NavigateToWish {
                wish_id: "wish-1".to_string()
            }
        );
        assert_eq!(
            outcome.state.phase(),
            &DraftPhase::Published {
                wish_id: "wish-1".to_string()
            }
        );

        let again = service.submit(&owner, &draft_id).await;
        assert!(matches!(again, Err(WishError::DraftNotFound(id)) if id == draft_id));
        assert_eq!(publisher.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_published_session_is_closed() {
        let service = DraftSessionService::new(
            TemplateCatalog::standard(),
            Arc::new(RecordingPublisher::new()),
        );
        let owner = author("uid-1");
        let draft_id = draft_at_last_step(&service, &owner).await;
        assert_eq!(service.open_sessions().unwrap(), 1);

        service.submit(&owner, &draft_id).await.unwrap();
        assert_eq!(service.open_sessions().unwrap(), 0);

        let result = service.get_draft(&owner, &draft_id);
        assert!(matches!(result, Err(WishError::DraftNotFound(_))));
    }

    #[tokio::test]
    async fn test_idle_sessions_are_swept_on_create() {
        let service = DraftSessionService::new(
            TemplateCatalog::standard(),
            Arc::new(RecordingPublisher::new()),
        )
        .with_limits(Duration::ZERO, DEFAULT_DRAFTS_PER_AUTHOR);
        let stale = service.create_draft(&author("uid-1"), None).unwrap().draft_id;

        let fresh = service.create_draft(&author("uid-2"), None).unwrap().draft_id;
        assert_eq!(service.open_sessions().unwrap(), 1);
        assert!(matches!(
            service.get_draft(&author("uid-1"), &stale),
            Err(WishError::DraftNotFound(_))
        ));
        assert!(service.get_draft(&author("uid-2"), &fresh).is_ok());
    }

    #[tokio::test]
    async fn test_author_draft_limit_evicts_least_recently_used() {
        let service = DraftSessionService::new(
            TemplateCatalog::standard(),
            Arc::new(RecordingPublisher::new()),
        )
        .with_limits(DEFAULT_IDLE_TTL, 2);
        let owner = author("uid-1");
        let other = service.create_draft(&author("uid-2"), None).unwrap().draft_id;
        let first = service.create_draft(&owner, None).unwrap().draft_id;
        let second = service.create_draft(&owner, None).unwrap().draft_id;

        // Using the first draft makes the second one the oldest
        service.get_draft(&owner, &first).unwrap();
        let third = service.create_draft(&owner, None).unwrap().draft_id;

        assert_eq!(service.open_sessions().unwrap(), 3);
        assert!(matches!(
            service.get_draft(&owner, &second),
            Err(WishError::DraftNotFound(_))
        ));
        assert!(service.get_draft(&owner, &first).is_ok());
        assert!(service.get_draft(&owner, &third).is_ok());
        assert!(service.get_draft(&author("uid-2"), &other).is_ok());
    }

    #[tokio::test]
    async fn test_publishing_session_survives_sweep() {
        let gate = Arc::new(Notify::new());
        let service = DraftSessionService::new(
            TemplateCatalog::standard(),
            Arc::new(RecordingPublisher::gated(gate.clone())),
        )
        .with_limits(Duration::ZERO, 1);
        let owner = author("uid-1");
        let draft_id = draft_at_last_step(&service, &owner).await;

        let pending = {
            let service = service.clone();
            let owner = owner.clone();
            let draft_id = draft_id.clone();
            tokio::spawn(async move { service.submit(&owner, &draft_id).await })
        };
        while !service.get_draft(&owner, &draft_id).unwrap().state.is_publishing() {
            tokio::task::yield_now().await;
        }

        service.create_draft(&owner, None).unwrap();
        assert_eq!(service.open_sessions().unwrap(), 2);

        gate.notify_one();
        let outcome = pending.await.unwrap().unwrap();
        assert!(matches!(outcome.effect, DraftEffect::NavigateToWish { .. }));
        assert_eq!(service.open_sessions().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_submits_write_once() {
        let gate = Arc::new(Notify::new());
        let publisher = Arc::new(RecordingPublisher::gated(gate.clone()));
        let service = DraftSessionService::new(TemplateCatalog::standard(), publisher.clone());
        let owner = author("uid-1");
        let draft_id = draft_at_last_step(&service, &owner).await;

        let first = {
            let service = service.clone();
            let owner = owner.clone();
            let draft_id = draft_id.clone();
            tokio::spawn(async move { service.submit(&owner, &draft_id).await })
        };

        while !service.get_draft(&owner, &draft_id).unwrap().state.is_publishing() {
            tokio::task::yield_now().await;
        }

        let second = service.submit(&owner, &draft_id).await.unwrap();
        assert_eq!(second.effect, DraftEffect::Blocked(BlockReason::PublishInFlight));

        gate.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(matches!(first.effect, DraftEffect::NavigateToWish { .. }));
        assert_eq!(publisher.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_publish_keeps_draft_data() {
        let service = DraftSessionService::new(
            TemplateCatalog::standard(),
            Arc::new(RecordingPublisher::failing()),
        );
        let owner = author("uid-1");
        let draft_id = draft_at_last_step(&service, &owner).await;

        let outcome = service.submit(&owner, &draft_id).await.unwrap();
        assert!(matches!(outcome.effect, DraftEffect::PublishFailed { ref reason } if reason == "store unavailable"));
        assert_eq!(outcome.state.phase(), &DraftPhase::Editing);
        assert_eq!(outcome.state.step(), 3);
        assert_eq!(outcome.state.draft().recipient_name, "Sam");
        assert_eq!(outcome.state.draft().message, "Happy birthday!");
    }

    #[tokio::test]
    async fn test_blocked_event_leaves_state_alone() {
        let service = DraftSessionService::new(
            TemplateCatalog::standard(),
            Arc::new(RecordingPublisher::new()),
        );
        let owner = author("uid-1");
        let draft_id = service.create_draft(&owner, None).unwrap().draft_id;

        let outcome = service
            .apply_event(&owner, &draft_id, DraftEvent::Next)
            .await
            .unwrap();
        assert_eq!(outcome.effect, DraftEffect::Blocked(BlockReason::MissingRecipientName));
        assert_eq!(outcome.state.step(), 1);
    }
}
