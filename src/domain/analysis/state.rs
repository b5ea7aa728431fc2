//! Derived per-turn conversation state.

use serde::{Deserialize, Serialize};

use super::outcome::CallOutcome;
use super::phase::CallPhase;
use super::rapport::RapportScorer;
use super::sentiment::Sentiment;

/// Snapshot of everything the analyzer infers from a transcript prefix.
///
/// Never the source of truth: always reproducible from the transcript,
/// the session start time, the budget and the persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub phase: CallPhase,
    pub rapport_score: u8,
    pub cooperation_factor: f64,
    pub sentiment: Sentiment,
    pub passion_hit: bool,
    pub passion_already_shared: bool,
    pub needs_detected: Vec<String>,
    pub objections_raised: Vec<String>,
    pub outcome: CallOutcome,
    pub outcome_confidence: f64,
    pub elapsed_minutes: f64,
    pub time_warning: bool,
    pub force_wrap_up: bool,
    /// Lines in the analyzed prefix, malformed ones included.
    pub turn_count: usize,
    /// Lines ignored for pattern matching.
    pub skipped_lines: usize,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            phase: CallPhase::Rapport,
            rapport_score: 0,
            cooperation_factor: RapportScorer::cooperation_factor(0),
            sentiment: Sentiment::Neutral,
            passion_hit: false,
            passion_already_shared: false,
            needs_detected: Vec::new(),
            objections_raised: Vec::new(),
            outcome: CallOutcome::Undecided,
            outcome_confidence: 0.0,
            elapsed_minutes: 0.0,
            time_warning: false,
            force_wrap_up: false,
            turn_count: 0,
            skipped_lines: 0,
        }
    }
}

impl ConversationState {
    /// True when the buyer just touched a passion the counterpart has not
    /// brought up yet, i.e. the one moment a passion hint is useful.
    pub fn should_hint_passion(&self) -> bool {
        self.passion_hit && !self.passion_already_shared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_matches_empty_transcript_rules() {
        let state = ConversationState::default();
        assert_eq!(state.phase, CallPhase::Rapport);
        assert_eq!(state.rapport_score, 0);
        assert_eq!(state.cooperation_factor, 0.6);
        assert_eq!(state.outcome, CallOutcome::Undecided);
        assert!(!state.time_warning);
        assert!(!state.force_wrap_up);
    }

    #[test]
    fn passion_hint_only_before_it_was_shared() {
        let mut state = ConversationState {
            passion_hit: true,
            ..Default::default()
        };
        assert!(state.should_hint_passion());
        state.passion_already_shared = true;
        assert!(!state.should_hint_passion());
    }
}
