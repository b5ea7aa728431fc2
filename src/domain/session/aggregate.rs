//! Session aggregate - one live coaching call.
//!
//! Owns the transcript, lifecycle status, annotations and the latest derived
//! `ConversationState`. All lifecycle changes go through the `StateMachine`
//! trait and leave an audit entry in `interventions`.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{AnalysisContext, ConversationState, PersonaProfile, TimeBudget};
use crate::domain::foundation::{SessionId, SessionStatus, StateMachine, Timestamp};
use crate::domain::transcript::{
    CoachingIntervention, InterventionKind, RecordingSnippet, Speaker, TranscriptLine,
    TranscriptRange,
};

use super::SessionError;

/// Session aggregate.
///
/// # Invariants
///
/// - `transcript` only grows; line `sequence` equals its index
/// - `status` changes only through validated transitions
/// - `ended_at` is set exactly when `status` is `Ended`
/// - `interventions` and `snippets` are append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    transcript: Vec<TranscriptLine>,
    status: SessionStatus,
    start_time: Timestamp,
    budget: TimeBudget,
    persona: PersonaProfile,
    interventions: Vec<CoachingIntervention>,
    snippets: Vec<RecordingSnippet>,
    latest_state: ConversationState,
    ended_at: Option<Timestamp>,
}

impl Session {
    /// Creates an active session with an empty transcript.
    pub fn new(id: SessionId, budget: TimeBudget, persona: PersonaProfile, start_time: Timestamp) -> Self {
        Self {
            id,
            transcript: Vec::new(),
            status: SessionStatus::Active,
            start_time,
            budget,
            persona,
            interventions: Vec::new(),
            snippets: Vec::new(),
            latest_state: ConversationState::default(),
            ended_at: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn start_time(&self) -> &Timestamp {
        &self.start_time
    }

    pub fn budget(&self) -> &TimeBudget {
        &self.budget
    }

    pub fn persona(&self) -> &PersonaProfile {
        &self.persona
    }

    pub fn interventions(&self) -> &[CoachingIntervention] {
        &self.interventions
    }

    pub fn snippets(&self) -> &[RecordingSnippet] {
        &self.snippets
    }

    pub fn latest_state(&self) -> &ConversationState {
        &self.latest_state
    }

    pub fn ended_at(&self) -> Option<&Timestamp> {
        self.ended_at.as_ref()
    }

    /// Context for re-analysing the transcript. The current rapport is the
    /// floor so the score never drops within a session.
    pub fn analysis_context(&self) -> AnalysisContext<'_> {
        AnalysisContext {
            start_time: self.start_time,
            budget: self.budget,
            persona: &self.persona,
            prior_rapport: self.latest_state.rapport_score,
        }
    }

    /// True once the session has been ended for at least `grace_secs`.
    pub fn is_expired(&self, now: &Timestamp, grace_secs: u64) -> bool {
        match &self.ended_at {
            Some(ended) => !now.is_before(&ended.plus_secs(grace_secs)),
            None => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transcript
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a turn, stamping its sequence.
    ///
    /// Sequence numbers define transcript order. Timestamps are taken as
    /// given and may arrive out of order; elapsed time is measured to the
    /// latest one.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the session has ended
    /// - `EmptyTurn` if the text is blank
    /// - `CounterpartSilenced` for counterpart turns outside `Active`
    pub fn append_line(&mut self, line: TranscriptLine) -> Result<&TranscriptLine, SessionError> {
        if !self.status.accepts_turns() {
            return Err(SessionError::invalid_transition(self.status, "submit a turn"));
        }
        if line.validate().is_err() {
            return Err(SessionError::EmptyTurn);
        }
        if line.speaker() == Speaker::Counterpart && !self.status.allows_counterpart() {
            return Err(SessionError::CounterpartSilenced { status: self.status });
        }

        let sequence = self.transcript.len() as u64;
        self.transcript.push(line.with_sequence(sequence));
        Ok(&self.transcript[self.transcript.len() - 1])
    }

    pub(crate) fn set_latest_state(&mut self, state: ConversationState) {
        self.latest_state = state;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Halts the two-party conversation for a learning moment.
    pub fn pause(&mut self, reason: impl Into<String>) -> Result<CoachingIntervention, SessionError> {
        self.transition(SessionStatus::Paused, "pause", reason.into())
    }

    /// Returns from a pause to the two-party conversation.
    pub fn resume(&mut self) -> Result<CoachingIntervention, SessionError> {
        self.transition(SessionStatus::Active, "resume", "resumed".to_string())
    }

    /// Dismisses the counterpart for the rest of the session.
    pub fn enter_coaching_only(
        &mut self,
        reason: impl Into<String>,
    ) -> Result<CoachingIntervention, SessionError> {
        self.transition(SessionStatus::CoachingOnly, "enter coaching-only mode", reason.into())
    }

    /// Marks the time budget as exhausted.
    pub fn time_out(&mut self) -> Result<CoachingIntervention, SessionError> {
        self.transition(SessionStatus::TimedOut, "time out", "time budget exhausted".to_string())
    }

    /// Ends the session. Returns `None` if it had already ended.
    pub fn end(&mut self, reason: impl Into<String>) -> Result<Option<CoachingIntervention>, SessionError> {
        if self.status == SessionStatus::Ended {
            return Ok(None);
        }
        self.transition(SessionStatus::Ended, "end", reason.into())
            .map(Some)
    }

    fn transition(
        &mut self,
        target: SessionStatus,
        action: &'static str,
        reason: String,
    ) -> Result<CoachingIntervention, SessionError> {
        let from = self.status;
        let to = from
            .transition_to(target)
            .map_err(|_| SessionError::invalid_transition(from, action))?;

        self.status = to;
        if to == SessionStatus::Ended {
            self.ended_at = Some(Timestamp::now());
        }

        let entry = CoachingIntervention::transition(from, to, reason, self.transcript.len());
        self.interventions.push(entry.clone());

        tracing::info!(
            session_id = %self.id,
            from = from.as_str(),
            to = to.as_str(),
            reason = %entry.reason,
            "Session transitioned"
        );
        Ok(entry)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Annotations
    // ─────────────────────────────────────────────────────────────────────────

    /// Records a coach intervention over a transcript range.
    ///
    /// Transition entries are reserved for lifecycle changes.
    pub fn record_intervention(
        &mut self,
        kind: InterventionKind,
        reason: impl Into<String>,
        range: TranscriptRange,
    ) -> Result<CoachingIntervention, SessionError> {
        self.ensure_not_ended("record an intervention")?;
        if matches!(kind, InterventionKind::Transition { .. }) {
            return Err(crate::domain::foundation::ValidationError::invalid_format(
                "kind",
                "transition entries are recorded by lifecycle changes",
            )
            .into());
        }
        range
            .validate(self.transcript.len())
            .map_err(SessionError::InvalidRange)?;

        let entry = CoachingIntervention::new(kind, reason, range);
        self.interventions.push(entry.clone());
        Ok(entry)
    }

    /// Marks a transcript range for replay in the debrief.
    pub fn record_snippet(
        &mut self,
        title: impl Into<String>,
        range: TranscriptRange,
    ) -> Result<RecordingSnippet, SessionError> {
        self.ensure_not_ended("record a snippet")?;
        range
            .validate(self.transcript.len())
            .map_err(SessionError::InvalidRange)?;

        let snippet = RecordingSnippet::new(title, range);
        self.snippets.push(snippet.clone());
        Ok(snippet)
    }

    fn ensure_not_ended(&self, action: &'static str) -> Result<(), SessionError> {
        if self.status == SessionStatus::Ended {
            Err(SessionError::invalid_transition(self.status, action))
        } else {
            Ok(())
        }
    }
}
