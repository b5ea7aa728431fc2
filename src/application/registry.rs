//! SessionRegistry - the live sessions of one process.
//!
//! # Locking
//!
//! The map sits behind a `RwLock` held only to insert, remove or snapshot
//! entries. Each session has its own `Mutex`, so submissions to one
//! session are serialized while different sessions proceed in parallel.
//! Eviction marks a session as evicted under its lock before removing it
//! from the map; a caller that looked the entry up earlier sees the flag
//! and reports `NotFound`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{watch, Mutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;

use crate::domain::analysis::{
    AnalysisContext, CallPhase, ConversationState, PersonaProfile, TimeBudget,
    DEFAULT_BUDGET_MINUTES, DEFAULT_WARNING_LEAD_MINUTES,
};
use crate::domain::foundation::{SessionId, SessionStatus, Timestamp, ValidationError};
use crate::domain::session::{Session, SessionError};
use crate::domain::transcript::{
    CoachingIntervention, InterventionKind, RecordingSnippet, TranscriptLine, TranscriptRange,
};

use super::turn_logger::{TurnLogger, TurnOutcome};

/// Smallest accepted session budget.
pub const MIN_BUDGET_MINUTES: u32 = 1;

/// Largest accepted session budget.
pub const MAX_BUDGET_MINUTES: u32 = 240;

/// Default time an ended session stays readable before eviction.
pub const DEFAULT_EVICTION_GRACE_SECS: u64 = 300;

/// Registry-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrySettings {
    pub default_budget_minutes: u32,
    pub warning_lead_minutes: u32,
    pub eviction_grace_secs: u64,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            default_budget_minutes: DEFAULT_BUDGET_MINUTES,
            warning_lead_minutes: DEFAULT_WARNING_LEAD_MINUTES,
            eviction_grace_secs: DEFAULT_EVICTION_GRACE_SECS,
        }
    }
}

/// Options for a new session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Registry default when unset.
    pub budget_minutes: Option<u32>,
    pub persona: PersonaProfile,
    /// Wall clock at creation when unset.
    pub start_time: Option<Timestamp>,
}

impl SessionOptions {
    pub fn with_budget(mut self, minutes: u32) -> Self {
        self.budget_minutes = Some(minutes);
        self
    }

    pub fn with_persona(mut self, persona: PersonaProfile) -> Self {
        self.persona = persona;
        self
    }

    pub fn starting_at(mut self, start_time: Timestamp) -> Self {
        self.start_time = Some(start_time);
        self
    }
}

/// Lightweight listing entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub status: SessionStatus,
    pub turn_count: usize,
    pub phase: CallPhase,
    pub rapport_score: u8,
    pub elapsed_minutes: f64,
}

struct LiveSession {
    session: Session,
    evicted: bool,
}

type SessionHandle = Arc<Mutex<LiveSession>>;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    logger: TurnLogger,
    settings: RegistrySettings,
}

impl SessionRegistry {
    pub fn new(logger: TurnLogger, settings: RegistrySettings) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            logger,
            settings,
        }
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Creation and lookup
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates an active session with the given budget and default persona.
    pub async fn create(&self, budget_minutes: u32) -> Result<SessionId, SessionError> {
        self.create_with(SessionOptions::default().with_budget(budget_minutes))
            .await
    }

    /// Creates an active session.
    ///
    /// # Errors
    ///
    /// - `Validation` if the budget is outside 1..=240 minutes or does not
    ///   exceed the warning lead
    pub async fn create_with(&self, options: SessionOptions) -> Result<SessionId, SessionError> {
        let minutes = options
            .budget_minutes
            .unwrap_or(self.settings.default_budget_minutes);
        let min_minutes = MIN_BUDGET_MINUTES.max(self.settings.warning_lead_minutes.saturating_add(1));
        if !(min_minutes..=MAX_BUDGET_MINUTES).contains(&minutes) {
            return Err(ValidationError::out_of_range(
                "budget_minutes",
                min_minutes as i64,
                MAX_BUDGET_MINUTES as i64,
                minutes as i64,
            )
            .into());
        }

        let id = SessionId::new();
        let budget = TimeBudget::new(minutes).with_warning_lead(self.settings.warning_lead_minutes);
        let start_time = options.start_time.unwrap_or_else(Timestamp::now);
        let session = Session::new(id, budget, options.persona, start_time);

        self.sessions.write().await.insert(
            id,
            Arc::new(Mutex::new(LiveSession {
                session,
                evicted: false,
            })),
        );

        tracing::info!(session_id = %id, budget_minutes = minutes, "Session created");
        Ok(id)
    }

    /// Snapshot of a session, `None` if unknown or evicted.
    pub async fn get(&self, id: SessionId) -> Option<Session> {
        self.acquire(id).await.ok().map(|live| live.session.clone())
    }

    pub async fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Summaries of every live session, in no particular order.
    pub async fn list(&self) -> Vec<SessionSummary> {
        let mut summaries = Vec::new();
        for handle in self.handles().await {
            let live = handle.lock().await;
            if live.evicted {
                continue;
            }
            let state = live.session.latest_state();
            summaries.push(SessionSummary {
                id: *live.session.id(),
                status: live.session.status(),
                turn_count: live.session.transcript().len(),
                phase: state.phase,
                rapport_score: state.rapport_score,
                elapsed_minutes: state.elapsed_minutes,
            });
        }
        summaries
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Turns
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a turn and returns the recomputed state.
    ///
    /// # Errors
    ///
    /// - `NotFound` for unknown or evicted ids; nothing is created
    /// - `EmptyTurn` for blank text
    /// - `CounterpartSilenced` for counterpart turns outside `Active`
    /// - `InvalidTransition` once the session has ended
    pub async fn submit(&self, id: SessionId, line: TranscriptLine) -> Result<TurnOutcome, SessionError> {
        let mut live = self.acquire(id).await?;
        self.logger.log_turn(&mut live.session, line).await
    }

    /// Re-runs the analyzer over a snapshot without holding the session lock.
    pub async fn analyze_snapshot(&self, id: SessionId) -> Result<ConversationState, SessionError> {
        let (transcript, start_time, budget, persona, prior_rapport) = {
            let live = self.acquire(id).await?;
            let session = &live.session;
            (
                session.transcript().to_vec(),
                *session.start_time(),
                *session.budget(),
                session.persona().clone(),
                session.latest_state().rapport_score,
            )
        };

        let ctx = AnalysisContext {
            start_time,
            budget,
            persona: &persona,
            prior_rapport,
        };
        Ok(self.logger.analyzer().analyze(&transcript, &ctx))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn pause(&self, id: SessionId, reason: impl Into<String>) -> Result<SessionStatus, SessionError> {
        let mut live = self.acquire(id).await?;
        let entry = live.session.pause(reason)?;
        self.logger.persist_intervention(id, &entry).await;
        Ok(live.session.status())
    }

    pub async fn resume(&self, id: SessionId) -> Result<SessionStatus, SessionError> {
        let mut live = self.acquire(id).await?;
        let entry = live.session.resume()?;
        self.logger.persist_intervention(id, &entry).await;
        Ok(live.session.status())
    }

    pub async fn enter_coaching_only(
        &self,
        id: SessionId,
        reason: impl Into<String>,
    ) -> Result<SessionStatus, SessionError> {
        let mut live = self.acquire(id).await?;
        let entry = live.session.enter_coaching_only(reason)?;
        self.logger.persist_intervention(id, &entry).await;
        Ok(live.session.status())
    }

    /// Ends the session. Ending an ended session is a no-op.
    pub async fn end(&self, id: SessionId, reason: impl Into<String>) -> Result<SessionStatus, SessionError> {
        let mut live = self.acquire(id).await?;
        if let Some(entry) = live.session.end(reason)? {
            self.logger.persist_intervention(id, &entry).await;
        }
        Ok(live.session.status())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Annotations
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn record_intervention(
        &self,
        id: SessionId,
        kind: InterventionKind,
        reason: impl Into<String>,
        range: TranscriptRange,
    ) -> Result<CoachingIntervention, SessionError> {
        let mut live = self.acquire(id).await?;
        let entry = live.session.record_intervention(kind, reason, range)?;
        self.logger.persist_intervention(id, &entry).await;
        Ok(entry)
    }

    pub async fn record_snippet(
        &self,
        id: SessionId,
        title: impl Into<String>,
        range: TranscriptRange,
    ) -> Result<RecordingSnippet, SessionError> {
        let mut live = self.acquire(id).await?;
        live.session.record_snippet(title, range)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Eviction
    // ─────────────────────────────────────────────────────────────────────────

    /// Removes sessions ended for longer than the grace period.
    ///
    /// Sessions whose lock is currently held are skipped and picked up by a
    /// later sweep. Returns the number of sessions removed.
    pub async fn evict_expired(&self, now: Timestamp) -> usize {
        let grace = self.settings.eviction_grace_secs;
        let candidates: Vec<(SessionId, SessionHandle)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, handle)| (*id, Arc::clone(handle)))
            .collect();

        let mut expired = Vec::new();
        for (id, handle) in candidates {
            let Ok(mut live) = handle.try_lock() else {
                continue;
            };
            if !live.evicted && live.session.is_expired(&now, grace) {
                live.evicted = true;
                expired.push(id);
            }
        }

        if expired.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        for id in &expired {
            sessions.remove(id);
            tracing::info!(session_id = %id, "Session evicted");
        }
        expired.len()
    }

    /// Runs `evict_expired` every `interval` until `shutdown` flips to true
    /// or its sender is dropped.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            tracing::info!(interval_secs = interval.as_secs(), "Session sweeper started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = self.evict_expired(Timestamp::now()).await;
                        if evicted > 0 {
                            tracing::debug!(evicted, "Sweep complete");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            tracing::info!("Session sweeper shutting down");
                            break;
                        }
                    }
                }
            }
        })
    }

    async fn handles(&self) -> Vec<SessionHandle> {
        self.sessions.read().await.values().cloned().collect()
    }

    async fn acquire(&self, id: SessionId) -> Result<OwnedMutexGuard<LiveSession>, SessionError> {
        let handle = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::not_found(id))?;

        let live = handle.lock_owned().await;
        if live.evicted {
            return Err(SessionError::not_found(id));
        }
        Ok(live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryTranscriptStore;
    use crate::domain::analysis::ConversationAnalyzer;
    use crate::domain::transcript::Speaker;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(
            TurnLogger::new(
                ConversationAnalyzer::default(),
                Arc::new(InMemoryTranscriptStore::new()),
            ),
            RegistrySettings::default(),
        )
    }

    mod creation {
        use super::*;

        #[tokio::test]
        async fn created_session_is_active_and_listed() {
            let registry = registry();
            let id = registry.create(20).await.unwrap();

            let session = registry.get(id).await.unwrap();
            assert_eq!(session.status(), SessionStatus::Active);
            assert_eq!(session.budget().budget_minutes, 20);
            assert_eq!(registry.list().await.len(), 1);
        }

        #[tokio::test]
        async fn budget_outside_bounds_is_rejected() {
            let registry = registry();
            assert!(matches!(registry.create(0).await, Err(SessionError::Validation(_))));
            assert!(matches!(registry.create(241).await, Err(SessionError::Validation(_))));
            assert!(registry.is_empty().await);
        }

        #[tokio::test]
        async fn budget_within_warning_lead_is_rejected() {
            let registry = registry();
            assert!(matches!(registry.create(1).await, Err(SessionError::Validation(_))));
            assert!(matches!(registry.create(2).await, Err(SessionError::Validation(_))));
            assert!(registry.create(3).await.is_ok());
        }

        #[tokio::test]
        async fn fresh_session_snapshot_has_no_time_flags() {
            let registry = registry();
            let id = registry.create(3).await.unwrap();

            let state = registry.analyze_snapshot(id).await.unwrap();
            assert_eq!(state.turn_count, 0);
            assert!(!state.time_warning);
            assert!(!state.force_wrap_up);
        }

        #[tokio::test]
        async fn unset_budget_uses_registry_default() {
            let registry = registry();
            let id = registry.create_with(SessionOptions::default()).await.unwrap();
            assert_eq!(
                registry.get(id).await.unwrap().budget().budget_minutes,
                DEFAULT_BUDGET_MINUTES
            );
        }
    }

    mod submit {
        use super::*;

        #[tokio::test]
        async fn unknown_session_is_not_found_and_not_created() {
            let registry = registry();
            let id = SessionId::new();
            let result = registry
                .submit(id, TranscriptLine::new(Speaker::User, "Hello?"))
                .await;
            assert_eq!(result, Err(SessionError::NotFound(id)));
            assert!(!registry.contains(id).await);
        }

        #[tokio::test]
        async fn empty_turn_changes_nothing() {
            let registry = registry();
            let id = registry.create(20).await.unwrap();
            let result = registry.submit(id, TranscriptLine::new(Speaker::User, " ")).await;
            assert_eq!(result, Err(SessionError::EmptyTurn));
            assert!(registry.get(id).await.unwrap().transcript().is_empty());
        }

        #[tokio::test]
        async fn counterpart_silenced_in_coaching_only() {
            let registry = registry();
            let id = registry.create(20).await.unwrap();
            registry.enter_coaching_only(id, "dismissed").await.unwrap();

            let result = registry
                .submit(id, TranscriptLine::new(Speaker::Counterpart, "Wait!"))
                .await;
            assert!(matches!(result, Err(SessionError::CounterpartSilenced { .. })));
            assert!(registry
                .submit(id, TranscriptLine::new(Speaker::Coach, "Good instinct there."))
                .await
                .is_ok());
        }

        #[tokio::test]
        async fn analyze_snapshot_matches_latest_state() {
            let registry = registry();
            let id = registry.create(20).await.unwrap();
            registry
                .submit(id, TranscriptLine::new(Speaker::User, "How are you?"))
                .await
                .unwrap();
            let outcome = registry
                .submit(id, TranscriptLine::new(Speaker::Counterpart, "Doing well, and you?"))
                .await
                .unwrap();

            let snapshot = registry.analyze_snapshot(id).await.unwrap();
            assert_eq!(snapshot, outcome.state);
        }
    }

    mod lifecycle {
        use super::*;

        #[tokio::test]
        async fn end_twice_is_fine() {
            let registry = registry();
            let id = registry.create(20).await.unwrap();
            assert_eq!(registry.end(id, "done").await.unwrap(), SessionStatus::Ended);
            assert_eq!(registry.end(id, "again").await.unwrap(), SessionStatus::Ended);
        }

        #[tokio::test]
        async fn operations_after_end_are_invalid() {
            let registry = registry();
            let id = registry.create(20).await.unwrap();
            registry.end(id, "done").await.unwrap();

            assert!(matches!(
                registry.pause(id, "late").await,
                Err(SessionError::InvalidTransition { .. })
            ));
            assert!(matches!(
                registry.submit(id, TranscriptLine::new(Speaker::User, "hi")).await,
                Err(SessionError::InvalidTransition { .. })
            ));
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
        async fn end_and_submit_serialize() {
            for _ in 0..50 {
                let registry = Arc::new(registry());
                let id = registry.create(20).await.unwrap();

                let submitter = {
                    let registry = Arc::clone(&registry);
                    tokio::spawn(async move {
                        registry
                            .submit(id, TranscriptLine::new(Speaker::User, "One more thing"))
                            .await
                    })
                };
                let ender = {
                    let registry = Arc::clone(&registry);
                    tokio::spawn(async move { registry.end(id, "hang up").await })
                };

                let submitted = submitter.await.unwrap();
                assert_eq!(ender.await.unwrap(), Ok(SessionStatus::Ended));

                let session = registry.get(id).await.unwrap();
                assert_eq!(session.status(), SessionStatus::Ended);
                match submitted {
                    Ok(outcome) => {
                        assert_eq!(outcome.status, SessionStatus::Active);
                        assert_eq!(session.transcript().len(), 1);
                        assert_eq!(session.latest_state().turn_count, 1);
                        let end_entry = session.interventions().last().unwrap();
                        assert_eq!(end_entry.range.start, 1);
                    }
                    Err(e) => {
                        assert!(matches!(e, SessionError::InvalidTransition { .. }));
                        assert!(session.transcript().is_empty());
                        assert_eq!(session.latest_state().turn_count, 0);
                    }
                }
            }
        }

        #[tokio::test]
        async fn resume_from_coaching_only_fails() {
            let registry = registry();
            let id = registry.create(20).await.unwrap();
            registry.enter_coaching_only(id, "dismissed").await.unwrap();
            let result = registry.resume(id).await;
            assert!(matches!(result, Err(SessionError::InvalidTransition { .. })));
        }

        #[tokio::test]
        async fn snippets_and_interventions_are_recorded() {
            let registry = registry();
            let id = registry.create(20).await.unwrap();
            registry
                .submit(id, TranscriptLine::new(Speaker::User, "So what's your budget?"))
                .await
                .unwrap();

            registry
                .record_intervention(id, InterventionKind::Hint, "build rapport first", TranscriptRange::new(0, 1))
                .await
                .unwrap();
            registry
                .record_snippet(id, "abrupt opener", TranscriptRange::new(0, 1))
                .await
                .unwrap();

            let session = registry.get(id).await.unwrap();
            assert_eq!(session.interventions().len(), 1);
            assert_eq!(session.snippets().len(), 1);
        }
    }

    mod eviction {
        use super::*;

        #[tokio::test]
        async fn ended_sessions_are_evicted_after_grace() {
            let registry = registry();
            let ended = registry.create(20).await.unwrap();
            let live = registry.create(20).await.unwrap();
            registry.end(ended, "done").await.unwrap();

            assert_eq!(registry.evict_expired(Timestamp::now()).await, 0);

            let later = Timestamp::now().plus_secs(DEFAULT_EVICTION_GRACE_SECS + 1);
            assert_eq!(registry.evict_expired(later).await, 1);
            assert!(registry.get(ended).await.is_none());
            assert!(registry.get(live).await.is_some());
        }

        #[tokio::test]
        async fn evicted_session_is_not_found() {
            let registry = registry();
            let id = registry.create(20).await.unwrap();
            registry.end(id, "done").await.unwrap();
            registry
                .evict_expired(Timestamp::now().plus_secs(DEFAULT_EVICTION_GRACE_SECS + 1))
                .await;

            assert_eq!(registry.end(id, "again").await, Err(SessionError::NotFound(id)));
        }

        #[tokio::test]
        async fn locked_session_survives_sweep_until_released() {
            let registry = registry();
            let id = registry.create(20).await.unwrap();
            registry.end(id, "done").await.unwrap();
            let later = Timestamp::now().plus_secs(DEFAULT_EVICTION_GRACE_SECS + 1);

            let guard = registry.acquire(id).await.unwrap();
            assert_eq!(registry.evict_expired(later).await, 0);
            assert!(registry.contains(id).await);
            assert_eq!(registry.len().await, 1);
            drop(guard);

            assert_eq!(registry.evict_expired(later).await, 1);
            assert!(!registry.contains(id).await);
        }

        #[tokio::test]
        async fn sweeper_stops_on_shutdown() {
            let registry = Arc::new(registry());
            let (tx, rx) = watch::channel(false);
            let handle = Arc::clone(&registry).spawn_sweeper(Duration::from_millis(10), rx);

            tokio::time::sleep(Duration::from_millis(30)).await;
            tx.send(true).unwrap();
            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .expect("sweeper should stop")
                .unwrap();
        }
    }
}
