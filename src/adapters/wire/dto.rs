//! Wire DTOs for turn submission.
//!
//! These types decouple the wire format from domain types.

use serde::{Deserialize, Serialize};

use crate::application::{AgentError, TurnOutcome};
use crate::domain::analysis::{CallOutcome, CallPhase};
use crate::domain::foundation::{ErrorCode, SessionStatus};
use crate::domain::session::SessionError;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to submit one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTurnRequest {
    pub session_id: String,
    /// `user`, `counterpart` or `coach`.
    pub speaker: String,
    pub text: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// State returned after a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitTurnResponse {
    pub phase: CallPhase,
    pub rapport_score: u8,
    pub outcome: CallOutcome,
    pub outcome_confidence: f64,
    pub lifecycle_state: SessionStatus,
    pub time_warning: bool,
    pub force_wrap_up: bool,
}

impl From<TurnOutcome> for SubmitTurnResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            phase: outcome.state.phase,
            rapport_score: outcome.state.rapport_score,
            outcome: outcome.state.outcome,
            outcome_confidence: outcome.state.outcome_confidence,
            lifecycle_state: outcome.status,
            time_warning: outcome.state.time_warning,
            force_wrap_up: outcome.state.force_wrap_up,
        }
    }
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }
}

impl From<SessionError> for ErrorResponse {
    fn from(err: SessionError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

impl From<AgentError> for ErrorResponse {
    fn from(err: AgentError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}
