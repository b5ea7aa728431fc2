//! PromptContext - the analysis values prompt construction consumes.
//!
//! The core does not word replies. It hands the prompt layer the phase
//! directive, the cooperation bias, time pressure and the one-time passion
//! hint, and the prompt layer decides how to phrase them.

use serde::Serialize;

use crate::domain::analysis::{CallOutcome, CallPhase, ConversationState, PersonaProfile, Sentiment};
use crate::domain::foundation::SessionStatus;

const WRAP_UP_NOTE: &str = "The time budget is spent. Bring the conversation to a close now.";
const TIME_WARNING_NOTE: &str = "Time is nearly up. Steer toward a decision.";
const PASSION_HINT: &str =
    "The seller just touched on something you care about. Warm up and share a little about it.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptContext {
    pub persona_name: String,
    pub phase: CallPhase,
    pub phase_directive: String,
    pub rapport_score: u8,
    /// Multiplier on counterpart agreeableness.
    pub cooperation_factor: f64,
    pub sentiment: Sentiment,
    pub outcome: CallOutcome,
    pub time_pressure: Option<String>,
    /// Present only until the counterpart has shared a passion once.
    pub passion_hint: Option<String>,
    pub should_wrap_up: bool,
    pub counterpart_active: bool,
}

impl PromptContext {
    pub fn from_state(state: &ConversationState, status: SessionStatus, persona: &PersonaProfile) -> Self {
        let should_wrap_up = state.force_wrap_up || status == SessionStatus::TimedOut;
        let time_pressure = if should_wrap_up {
            Some(WRAP_UP_NOTE.to_string())
        } else if state.time_warning {
            Some(TIME_WARNING_NOTE.to_string())
        } else {
            None
        };

        Self {
            persona_name: persona.name.clone(),
            phase: state.phase,
            phase_directive: state.phase.directive().to_string(),
            rapport_score: state.rapport_score,
            cooperation_factor: state.cooperation_factor,
            sentiment: state.sentiment,
            outcome: state.outcome,
            time_pressure,
            passion_hint: state.should_hint_passion().then(|| PASSION_HINT.to_string()),
            should_wrap_up,
            counterpart_active: status.allows_counterpart(),
        }
    }

    /// System prompt for the simulated buyer.
    pub fn counterpart_prompt(&self, persona: &PersonaProfile) -> String {
        let mut lines = vec![
            format!("You are {}, a prospective buyer on a sales call.", persona.name),
            self.phase_directive.clone(),
            format!("Cooperation factor: {:.1}.", self.cooperation_factor),
        ];
        if !persona.pain_points.is_empty() {
            lines.push(format!("Pain points: {}.", persona.pain_points.join(", ")));
        }
        if !persona.objections.is_empty() {
            lines.push(format!("Likely objections: {}.", persona.objections.join(", ")));
        }
        lines.extend(self.time_pressure.clone());
        lines.extend(self.passion_hint.clone());
        lines.join("\n")
    }

    /// System prompt for the coach watching the call.
    pub fn coach_prompt(&self) -> String {
        let mut lines = vec![
            "You are a sales coach observing a practice call.".to_string(),
            format!(
                "Current phase: {}. Rapport: {}/5. Buyer sentiment: {}. Likely outcome: {}.",
                self.phase, self.rapport_score, self.sentiment, self.outcome
            ),
        ];
        if self.outcome.is_decided() {
            lines.push(format!(
                "The buyer is leaning toward {}; help the seller respond to it.",
                self.outcome
            ));
        }
        if !self.counterpart_active {
            lines.push("The buyer has left the conversation; speak only to the seller.".to_string());
        }
        lines.extend(self.time_pressure.clone());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona() -> PersonaProfile {
        PersonaProfile::new("Dana")
            .with_pain_points(["manual reporting"])
            .with_passions(["sailing"])
    }

    #[test]
    fn opening_state_has_no_pressure_or_hint() {
        let ctx = PromptContext::from_state(&ConversationState::default(), SessionStatus::Active, &persona());
        assert_eq!(ctx.phase, CallPhase::Rapport);
        assert_eq!(ctx.cooperation_factor, 0.6);
        assert!(ctx.time_pressure.is_none());
        assert!(ctx.passion_hint.is_none());
        assert!(!ctx.should_wrap_up);
        assert!(ctx.counterpart_active);
    }

    #[test]
    fn passion_hint_is_offered_once() {
        let mut state = ConversationState {
            passion_hit: true,
            ..Default::default()
        };
        let ctx = PromptContext::from_state(&state, SessionStatus::Active, &persona());
        assert!(ctx.passion_hint.is_some());

        state.passion_already_shared = true;
        let ctx = PromptContext::from_state(&state, SessionStatus::Active, &persona());
        assert!(ctx.passion_hint.is_none());
    }

    #[test]
    fn time_flags_become_pressure() {
        let state = ConversationState {
            time_warning: true,
            ..Default::default()
        };
        let ctx = PromptContext::from_state(&state, SessionStatus::Active, &persona());
        assert_eq!(ctx.time_pressure.as_deref(), Some(TIME_WARNING_NOTE));

        let ctx = PromptContext::from_state(&state, SessionStatus::TimedOut, &persona());
        assert!(ctx.should_wrap_up);
        assert_eq!(ctx.time_pressure.as_deref(), Some(WRAP_UP_NOTE));
        assert!(!ctx.counterpart_active);
    }

    #[test]
    fn counterpart_prompt_carries_persona_and_directive() {
        let persona = persona();
        let ctx = PromptContext::from_state(&ConversationState::default(), SessionStatus::Active, &persona);
        let prompt = ctx.counterpart_prompt(&persona);
        assert!(prompt.contains("You are Dana"));
        assert!(prompt.contains(CallPhase::Rapport.directive()));
        assert!(prompt.contains("manual reporting"));
    }

    #[test]
    fn coach_prompt_notes_dismissed_counterpart() {
        let ctx = PromptContext::from_state(&ConversationState::default(), SessionStatus::CoachingOnly, &persona());
        assert!(ctx.coach_prompt().contains("left the conversation"));
    }

    #[test]
    fn coach_prompt_names_a_decided_outcome_only() {
        let undecided = PromptContext::from_state(&ConversationState::default(), SessionStatus::Active, &persona());
        assert!(!undecided.coach_prompt().contains("leaning toward"));

        let state = ConversationState {
            outcome: CallOutcome::Commit,
            ..Default::default()
        };
        let decided = PromptContext::from_state(&state, SessionStatus::Active, &persona());
        assert!(decided.coach_prompt().contains("leaning toward commit"));
    }
}
