//! Call-outcome classification from buyer turns.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::patterns::OUTCOME_PATTERNS;
use super::rapport::MAX_RAPPORT;

/// Minimum arg-max probability for a decided outcome.
pub const MIN_OUTCOME_PROBABILITY: f64 = 0.4;

/// Minimum margin between the top two classes for a decided outcome.
pub const MIN_OUTCOME_MARGIN: f64 = 0.15;

/// Fixed logit of the `Undecided` class.
pub const UNDECIDED_BASELINE: f64 = 1.5;

const MATCH_WEIGHT: f64 = 3.0;

/// Inferred resolution of the exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Commit,
    FollowUp,
    NoFit,
    #[default]
    Undecided,
}

impl CallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Commit => "commit",
            CallOutcome::FollowUp => "follow_up",
            CallOutcome::NoFit => "no_fit",
            CallOutcome::Undecided => "undecided",
        }
    }

    pub fn is_decided(&self) -> bool {
        !matches!(self, CallOutcome::Undecided)
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label plus margin over the runner-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeAssessment {
    pub outcome: CallOutcome,
    pub confidence: f64,
}

impl Default for OutcomeAssessment {
    fn default() -> Self {
        Self {
            outcome: CallOutcome::Undecided,
            confidence: 0.0,
        }
    }
}

/// Outcome classification functions.
pub struct OutcomeClassifier;

impl OutcomeClassifier {
    /// Classifies the recent buyer turns.
    ///
    /// # Algorithm
    /// For each signal class, `m` = matching patterns summed over `turns`.
    /// Logit = `1 + 3m`, plus a rapport bonus when `m > 0` (commit
    /// `0.5·r`, follow-up `0.25·r`, no-fit `0.25·(5 − r)`). `Undecided`
    /// carries a fixed baseline. Softmax; confidence is top probability
    /// minus runner-up. A top probability below 0.4 or a margin below 0.15
    /// forces `Undecided`.
    ///
    /// # Edge Cases
    /// - No turns or no matches: `Undecided`
    pub fn classify(turns: &[&str], rapport: u8) -> OutcomeAssessment {
        let rapport = rapport.min(MAX_RAPPORT) as f64;
        let count = |outcome: CallOutcome| -> f64 {
            turns
                .iter()
                .map(|t| OUTCOME_PATTERNS.count_matches(outcome, t))
                .sum::<usize>() as f64
        };

        let logit = |outcome: CallOutcome, bonus: f64| -> (CallOutcome, f64) {
            let m = count(outcome);
            let bonus = if m > 0.0 { bonus } else { 0.0 };
            (outcome, 1.0 + m * MATCH_WEIGHT + bonus)
        };

        let logits = [
            logit(CallOutcome::Commit, 0.5 * rapport),
            logit(CallOutcome::FollowUp, 0.25 * rapport),
            logit(CallOutcome::NoFit, 0.25 * (MAX_RAPPORT as f64 - rapport)),
            (CallOutcome::Undecided, UNDECIDED_BASELINE),
        ];

        let probabilities = softmax(&logits);
        let (mut top, mut runner_up) = (probabilities[0], probabilities[1]);
        if runner_up.1 > top.1 {
            std::mem::swap(&mut top, &mut runner_up);
        }
        for candidate in probabilities.iter().skip(2) {
            if candidate.1 > top.1 {
                runner_up = top;
                top = *candidate;
            } else if candidate.1 > runner_up.1 {
                runner_up = *candidate;
            }
        }

        let confidence = top.1 - runner_up.1;
        let outcome = if top.1 < MIN_OUTCOME_PROBABILITY || confidence < MIN_OUTCOME_MARGIN {
            CallOutcome::Undecided
        } else {
            top.0
        };

        OutcomeAssessment { outcome, confidence }
    }
}

fn softmax(logits: &[(CallOutcome, f64); 4]) -> [(CallOutcome, f64); 4] {
    let max = logits.iter().map(|(_, l)| *l).fold(f64::NEG_INFINITY, f64::max);
    let exps = logits.map(|(o, l)| (o, (l - max).exp()));
    let total: f64 = exps.iter().map(|(_, e)| e).sum();
    exps.map(|(o, e)| (o, e / total))
}
