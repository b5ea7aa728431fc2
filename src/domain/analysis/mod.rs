//! Analysis Module - Pure conversation analysis.
//!
//! Takes a transcript prefix plus session context and derives the live
//! `ConversationState`: call phase, rapport, sentiment, persona signals,
//! outcome estimate and time-budget flags.
//!
//! # Components
//!
//! - `ConversationAnalyzer` - Composes the scorers below into one state
//! - `PhaseClassifier` - Windowed phase inference with retention
//! - `RapportScorer` - Mirrored small-talk exchanges, capped at 5
//! - `OutcomeClassifier` - Softmax over outcome pattern hits
//! - `TimeBudget` - Warning and wrap-up flags
//!
//! All functions are pure. Heuristic vocabulary lives in `patterns` as
//! data, so tuning never touches control flow.

mod analyzer;
mod outcome;
mod patterns;
mod persona;
mod phase;
mod rapport;
mod sentiment;
mod state;
mod time_budget;

pub use analyzer::{
    AnalysisContext, AnalyzerInputError, AnalyzerSettings, ConversationAnalyzer,
    DEFAULT_OUTCOME_WINDOW, DEFAULT_PHASE_WINDOW,
};
pub use outcome::{
    CallOutcome, OutcomeAssessment, OutcomeClassifier, MIN_OUTCOME_MARGIN,
    MIN_OUTCOME_PROBABILITY, UNDECIDED_BASELINE,
};
pub use persona::PersonaProfile;
pub use phase::{CallPhase, PhaseClassifier};
pub use rapport::{RapportScorer, MAX_RAPPORT};
pub use sentiment::Sentiment;
pub use state::ConversationState;
pub use time_budget::{BudgetFlags, TimeBudget, DEFAULT_BUDGET_MINUTES, DEFAULT_WARNING_LEAD_MINUTES};
