//! SessionStatus enum for tracking the lifecycle of a coaching session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a live coaching session.
///
/// ```text
/// Active ⇄ Paused
///   │        │
///   └──┬─────┘
///      ▼
/// CoachingOnly ──► TimedOut ──► Ended
/// ```
///
/// Every non-ended status may also move straight to `TimedOut` or `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Two-party conversation with the simulated counterpart.
    #[default]
    Active,
    /// Halted for a learning moment; the counterpart is waiting.
    Paused,
    /// Counterpart dismissed; only the coach may respond.
    CoachingOnly,
    /// Time budget exhausted; debrief only.
    TimedOut,
    /// Terminal.
    Ended,
}

impl SessionStatus {
    /// Returns true if the simulated counterpart may still speak.
    pub fn allows_counterpart(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }

    /// Returns true if user and coach turns are still accepted.
    pub fn accepts_turns(&self) -> bool {
        !matches!(self, SessionStatus::Ended)
    }

    /// Wire label, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Paused => "paused",
            SessionStatus::CoachingOnly => "coaching_only",
            SessionStatus::TimedOut => "timed_out",
            SessionStatus::Ended => "ended",
        }
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Active, Paused)
                | (Paused, Active)
                | (Active, CoachingOnly)
                | (Paused, CoachingOnly)
                | (Active, TimedOut)
                | (Paused, TimedOut)
                | (CoachingOnly, TimedOut)
                | (Active, Ended)
                | (Paused, Ended)
                | (CoachingOnly, Ended)
                | (TimedOut, Ended)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Active => vec![Paused, CoachingOnly, TimedOut, Ended],
            Paused => vec![Active, CoachingOnly, TimedOut, Ended],
            CoachingOnly => vec![TimedOut, Ended],
            TimedOut => vec![Ended],
            Ended => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(SessionStatus::default(), SessionStatus::Active);
    }

    #[test]
    fn only_active_allows_counterpart() {
        assert!(SessionStatus::Active.allows_counterpart());
        assert!(!SessionStatus::Paused.allows_counterpart());
        assert!(!SessionStatus::CoachingOnly.allows_counterpart());
        assert!(!SessionStatus::TimedOut.allows_counterpart());
        assert!(!SessionStatus::Ended.allows_counterpart());
    }

    #[test]
    fn ended_accepts_no_turns() {
        assert!(!SessionStatus::Ended.accepts_turns());
        assert!(SessionStatus::TimedOut.accepts_turns());
    }

    #[test]
    fn coaching_only_cannot_return_to_active() {
        assert!(!SessionStatus::CoachingOnly.can_transition_to(&SessionStatus::Active));
        assert!(!SessionStatus::CoachingOnly.can_transition_to(&SessionStatus::Paused));
    }

    #[test]
    fn timed_out_only_ends() {
        assert_eq!(SessionStatus::TimedOut.valid_transitions(), vec![SessionStatus::Ended]);
    }

    #[test]
    fn display_matches_serde_label() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Paused,
            SessionStatus::CoachingOnly,
            SessionStatus::TimedOut,
            SessionStatus::Ended,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }
}
