//! TurnLogger - appends turns, re-analyses, and forwards persistence.
//!
//! Callers hold the session lock for the whole call, so appends and the
//! analysis that follows them are serialized per session.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::analysis::{ConversationAnalyzer, ConversationState};
use crate::domain::foundation::{SessionId, SessionStatus, StateMachine};
use crate::domain::session::{Session, SessionError};
use crate::domain::transcript::{CoachingIntervention, TranscriptLine};
use crate::ports::TranscriptStore;

/// What a caller gets back for one submitted turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    /// The line as appended, with its sequence.
    pub line: TranscriptLine,
    pub state: ConversationState,
    pub status: SessionStatus,
    /// True when this turn moved the session to `TimedOut`.
    pub timed_out: bool,
}

pub struct TurnLogger {
    analyzer: ConversationAnalyzer,
    store: Arc<dyn TranscriptStore>,
}

impl TurnLogger {
    pub fn new(analyzer: ConversationAnalyzer, store: Arc<dyn TranscriptStore>) -> Self {
        Self { analyzer, store }
    }

    pub fn analyzer(&self) -> &ConversationAnalyzer {
        &self.analyzer
    }

    /// Appends `line`, recomputes the conversation state and times the
    /// session out once the budget is exhausted.
    ///
    /// # Errors
    ///
    /// Whatever `Session::append_line` rejects; the session is untouched.
    pub async fn log_turn(
        &self,
        session: &mut Session,
        line: TranscriptLine,
    ) -> Result<TurnOutcome, SessionError> {
        let session_id = *session.id();
        let line = session.append_line(line)?.clone();
        self.persist_line(session_id, &line).await;

        let state = self
            .analyzer
            .analyze(session.transcript(), &session.analysis_context());
        session.set_latest_state(state.clone());

        let mut timed_out = false;
        if state.force_wrap_up && session.status().can_transition_to(&SessionStatus::TimedOut) {
            let entry = session.time_out()?;
            tracing::info!(
                session_id = %session_id,
                elapsed_minutes = state.elapsed_minutes,
                budget_minutes = session.budget().budget_minutes,
                "Session timed out"
            );
            self.persist_intervention(session_id, &entry).await;
            timed_out = true;
        }

        tracing::debug!(
            session_id = %session_id,
            sequence = line.sequence(),
            speaker = %line.speaker(),
            phase = %state.phase,
            rapport = state.rapport_score,
            outcome = %state.outcome,
            "Turn logged"
        );

        Ok(TurnOutcome {
            line,
            state,
            status: session.status(),
            timed_out,
        })
    }

    /// Store failures never fail the turn; the in-memory session stays
    /// authoritative.
    pub async fn persist_line(&self, session_id: SessionId, line: &TranscriptLine) {
        if let Err(e) = self.store.append_line(session_id, line).await {
            tracing::warn!(session_id = %session_id, sequence = line.sequence(), error = %e, "Failed to persist transcript line");
        }
    }

    pub async fn persist_intervention(&self, session_id: SessionId, intervention: &CoachingIntervention) {
        if let Err(e) = self.store.append_intervention(session_id, intervention).await {
            tracing::warn!(session_id = %session_id, error = %e, "Failed to persist intervention");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryTranscriptStore;
    use crate::domain::analysis::{PersonaProfile, TimeBudget};
    use crate::domain::foundation::Timestamp;
    use crate::domain::transcript::Speaker;
    use crate::ports::TranscriptStoreError;
    use async_trait::async_trait;

    struct FailingStore;

    #[async_trait]
    impl TranscriptStore for FailingStore {
        async fn append_line(&self, _: SessionId, _: &TranscriptLine) -> Result<(), TranscriptStoreError> {
            Err(TranscriptStoreError::IoError("disk full".to_string()))
        }

        async fn append_intervention(
            &self,
            _: SessionId,
            _: &CoachingIntervention,
        ) -> Result<(), TranscriptStoreError> {
            Err(TranscriptStoreError::IoError("disk full".to_string()))
        }

        async fn load_transcript(&self, id: SessionId) -> Result<Vec<TranscriptLine>, TranscriptStoreError> {
            Err(TranscriptStoreError::NotFound(id))
        }

        async fn load_interventions(
            &self,
            _: SessionId,
        ) -> Result<Vec<CoachingIntervention>, TranscriptStoreError> {
            Ok(Vec::new())
        }
    }

    fn session(start: Timestamp) -> Session {
        Session::new(SessionId::new(), TimeBudget::new(20), PersonaProfile::default(), start)
    }

    #[tokio::test]
    async fn logged_turn_is_persisted_and_analysed() {
        let store = Arc::new(InMemoryTranscriptStore::new());
        let logger = TurnLogger::new(ConversationAnalyzer::default(), store.clone());
        let start = Timestamp::now();
        let mut session = session(start);

        logger
            .log_turn(&mut session, TranscriptLine::at(Speaker::User, "How are you?", start.plus_secs(5)))
            .await
            .unwrap();
        let outcome = logger
            .log_turn(
                &mut session,
                TranscriptLine::at(Speaker::Counterpart, "Doing great, and you?", start.plus_secs(10)),
            )
            .await
            .unwrap();

        assert_eq!(outcome.line.sequence(), 1);
        assert_eq!(outcome.state.rapport_score, 1);
        assert_eq!(outcome.status, SessionStatus::Active);
        assert!(!outcome.timed_out);
        assert_eq!(session.latest_state(), &outcome.state);
        assert_eq!(store.load_transcript(*session.id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn exhausted_budget_times_out_once() {
        let store = Arc::new(InMemoryTranscriptStore::new());
        let logger = TurnLogger::new(ConversationAnalyzer::default(), store.clone());
        let start = Timestamp::now();
        let mut session = session(start);

        let outcome = logger
            .log_turn(&mut session, TranscriptLine::at(Speaker::User, "Still there?", start.plus_minutes(20.1)))
            .await
            .unwrap();
        assert!(outcome.timed_out);
        assert_eq!(outcome.status, SessionStatus::TimedOut);

        let outcome = logger
            .log_turn(&mut session, TranscriptLine::at(Speaker::Coach, "Let's debrief.", start.plus_minutes(21.0)))
            .await
            .unwrap();
        assert!(!outcome.timed_out);
        assert_eq!(store.load_interventions(*session.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejected_turn_leaves_session_untouched() {
        let logger = TurnLogger::new(ConversationAnalyzer::default(), Arc::new(InMemoryTranscriptStore::new()));
        let mut session = session(Timestamp::now());

        let result = logger.log_turn(&mut session, TranscriptLine::new(Speaker::User, "")).await;
        assert_eq!(result, Err(SessionError::EmptyTurn));
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn store_failures_do_not_fail_the_turn() {
        let logger = TurnLogger::new(ConversationAnalyzer::default(), Arc::new(FailingStore));
        let mut session = session(Timestamp::now());

        let result = logger.log_turn(&mut session, TranscriptLine::new(Speaker::User, "Hello")).await;
        assert!(result.is_ok());
        assert_eq!(session.transcript().len(), 1);
    }
}
