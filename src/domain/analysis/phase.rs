//! Call phases and rule-based phase inference.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::patterns::PHASE_PATTERNS;

/// Inferred stage of the sales conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallPhase {
    /// Opening small talk and relationship building.
    #[default]
    Rapport,
    /// Questions about the buyer's situation and needs.
    Discovery,
    /// Pitching the product against those needs.
    Presentation,
    /// Buyer pushes back; seller responds.
    ObjectionHandling,
    /// Asking for and agreeing on commitment.
    Closing,
    /// Label not recognised (e.g. parsed from an unknown wire value).
    Unknown,
}

impl CallPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallPhase::Rapport => "rapport",
            CallPhase::Discovery => "discovery",
            CallPhase::Presentation => "presentation",
            CallPhase::ObjectionHandling => "objection_handling",
            CallPhase::Closing => "closing",
            CallPhase::Unknown => "unknown",
        }
    }

    /// What the simulated buyer should be reacting to in this phase.
    pub fn directive(&self) -> &'static str {
        match self {
            CallPhase::Rapport => "Respond to small talk naturally; you have not discussed business yet.",
            CallPhase::Discovery => "Answer questions about your situation; reveal pain points only when asked well.",
            CallPhase::Presentation => "Evaluate what is being pitched against your needs.",
            CallPhase::ObjectionHandling => "Raise and test your concerns; accept only convincing answers.",
            CallPhase::Closing => "Decide whether to commit, ask for a follow-up, or decline.",
            CallPhase::Unknown => "Stay in character.",
        }
    }
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rule-based phase classification.
pub struct PhaseClassifier;

impl PhaseClassifier {
    /// Classifies a window of recent turn texts (oldest first).
    ///
    /// # Algorithm
    /// Each phase scores the number of its patterns matching each turn,
    /// summed over the window. Highest score wins; ties go to the phase that
    /// matched the most recent turn, then to the later phase in call order.
    ///
    /// # Edge Cases
    /// - Empty window or no match at all: returns `previous`
    pub fn infer(window: &[&str], previous: CallPhase) -> CallPhase {
        let mut best: Option<(usize, usize, usize, CallPhase)> = None;

        for (priority, phase) in PHASE_PATTERNS.labels().enumerate() {
            let mut score = 0;
            let mut latest = 0;
            for (position, text) in window.iter().enumerate() {
                let hits = PHASE_PATTERNS.count_matches(phase, text);
                if hits > 0 {
                    score += hits;
                    latest = position + 1;
                }
            }
            if score == 0 {
                continue;
            }
            let candidate = (score, latest, priority, phase);
            let better = match best {
                None => true,
                Some((s, l, p, _)) => (score, latest, priority) > (s, l, p),
            };
            if better {
                best = Some(candidate);
            }
        }

        best.map(|(_, _, _, phase)| phase).unwrap_or(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod labels {
        use super::*;

        #[test]
        fn default_phase_is_rapport() {
            assert_eq!(CallPhase::default(), CallPhase::Rapport);
        }

        #[test]
        fn serializes_to_snake_case() {
            let json = serde_json::to_string(&CallPhase::ObjectionHandling).unwrap();
            assert_eq!(json, "\"objection_handling\"");
        }
    }

    mod inference {
        use super::*;

        #[test]
        fn no_match_retains_previous_phase() {
            let window = ["Sure.", "Okay, go on."];
            assert_eq!(
                PhaseClassifier::infer(&window, CallPhase::Presentation),
                CallPhase::Presentation
            );
        }

        #[test]
        fn empty_window_retains_previous_phase() {
            assert_eq!(PhaseClassifier::infer(&[], CallPhase::Discovery), CallPhase::Discovery);
        }

        #[test]
        fn closing_vocabulary_is_detected() {
            let window = ["Great, can you send the contract today?"];
            assert_eq!(PhaseClassifier::infer(&window, CallPhase::Rapport), CallPhase::Closing);
        }

        #[test]
        fn objection_vocabulary_is_detected() {
            let window = ["Honestly I'm concerned about the rollout, it seems too expensive."];
            assert_eq!(
                PhaseClassifier::infer(&window, CallPhase::Presentation),
                CallPhase::ObjectionHandling
            );
        }

        #[test]
        fn higher_score_beats_recency() {
            let window = [
                "Tell me about your pain points and what is not working.",
                "Let me show you a demo.",
            ];
            assert_eq!(PhaseClassifier::infer(&window, CallPhase::Rapport), CallPhase::Discovery);
        }

        #[test]
        fn tie_prefers_most_recent_matching_turn() {
            let window = ["Tell me about your team.", "Here is a demo."];
            assert_eq!(
                PhaseClassifier::infer(&window, CallPhase::Rapport),
                CallPhase::Presentation
            );

            let window = ["Here is a demo.", "Tell me about your team."];
            assert_eq!(PhaseClassifier::infer(&window, CallPhase::Rapport), CallPhase::Discovery);
        }
    }
}
