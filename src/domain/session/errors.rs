//! Session-specific error types.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, SessionId, SessionStatus, ValidationError};

/// Errors returned synchronously by session and registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Cannot {action} while session is {from}")]
    InvalidTransition {
        from: SessionStatus,
        action: &'static str,
    },

    #[error("Turn text cannot be empty")]
    EmptyTurn,

    #[error("Counterpart cannot speak while session is {status}")]
    CounterpartSilenced { status: SessionStatus },

    #[error("Invalid annotation range: {0}")]
    InvalidRange(ValidationError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl SessionError {
    pub fn not_found(id: SessionId) -> Self {
        SessionError::NotFound(id)
    }

    pub fn invalid_transition(from: SessionStatus, action: &'static str) -> Self {
        SessionError::InvalidTransition { from, action }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            SessionError::EmptyTurn => ErrorCode::EmptyTurn,
            SessionError::CounterpartSilenced { .. } => ErrorCode::CounterpartSilenced,
            SessionError::InvalidRange(_) => ErrorCode::InvalidAnnotationRange,
            SessionError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_action_and_state() {
        let err = SessionError::invalid_transition(SessionStatus::CoachingOnly, "resume");
        assert_eq!(err.to_string(), "Cannot resume while session is coaching_only");
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn codes_cover_every_variant() {
        let id = SessionId::new();
        assert_eq!(SessionError::not_found(id).code(), ErrorCode::SessionNotFound);
        assert_eq!(SessionError::EmptyTurn.code(), ErrorCode::EmptyTurn);
        assert_eq!(
            SessionError::CounterpartSilenced {
                status: SessionStatus::Paused
            }
            .code(),
            ErrorCode::CounterpartSilenced
        );
        assert_eq!(
            SessionError::InvalidRange(ValidationError::empty_field("range")).code(),
            ErrorCode::InvalidAnnotationRange
        );
        assert_eq!(
            SessionError::from(ValidationError::empty_field("x")).code(),
            ErrorCode::ValidationFailed
        );
    }
}
