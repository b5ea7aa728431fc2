//! Conversation analyzer - transcript prefix in, `ConversationState` out.

use thiserror::Error;

use crate::domain::foundation::Timestamp;
use crate::domain::transcript::{Speaker, TranscriptLine};

use super::outcome::{OutcomeAssessment, OutcomeClassifier};
use super::persona::PersonaProfile;
use super::phase::{CallPhase, PhaseClassifier};
use super::rapport::RapportScorer;
use super::sentiment::Sentiment;
use super::state::ConversationState;
use super::time_budget::{BudgetFlags, TimeBudget};

/// Default number of recent turns scored for phase inference.
pub const DEFAULT_PHASE_WINDOW: usize = 4;

/// Default number of recent counterpart turns scored for outcome.
pub const DEFAULT_OUTCOME_WINDOW: usize = 3;

/// Reasons a line is excluded from pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzerInputError {
    #[error("transcript line {sequence} has no text")]
    EmptyText { sequence: u64 },

    #[error("transcript line {sequence} contains undecodable text")]
    UndecodableText { sequence: u64 },
}

impl AnalyzerInputError {
    /// Checks whether a line can take part in pattern matching.
    ///
    /// Lossy-decoded text (carrying U+FFFD) is treated as undecodable.
    pub fn check(line: &TranscriptLine) -> Result<(), AnalyzerInputError> {
        let sequence = line.sequence();
        if line.text().trim().is_empty() {
            return Err(AnalyzerInputError::EmptyText { sequence });
        }
        if line.text().contains(char::REPLACEMENT_CHARACTER) {
            return Err(AnalyzerInputError::UndecodableText { sequence });
        }
        Ok(())
    }
}

/// Tunables for the analyzer windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerSettings {
    pub phase_window: usize,
    pub outcome_window: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            phase_window: DEFAULT_PHASE_WINDOW,
            outcome_window: DEFAULT_OUTCOME_WINDOW,
        }
    }
}

/// Session facts the analysis depends on besides the transcript.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub start_time: Timestamp,
    pub budget: TimeBudget,
    pub persona: &'a PersonaProfile,
    /// Rapport already established; the result never drops below it.
    pub prior_rapport: u8,
}

/// Pure, deterministic transcript analysis.
#[derive(Debug, Clone, Default)]
pub struct ConversationAnalyzer {
    settings: AnalyzerSettings,
}

impl ConversationAnalyzer {
    pub fn new(settings: AnalyzerSettings) -> Self {
        Self {
            settings: AnalyzerSettings {
                phase_window: settings.phase_window.max(1),
                outcome_window: settings.outcome_window.max(1),
            },
        }
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// Analyzes a full transcript prefix.
    ///
    /// Total: malformed lines are logged and skipped for matching, but
    /// their timestamps still count toward elapsed time.
    ///
    /// `elapsed_minutes` is measured to the latest timestamp in the
    /// transcript, not the last line, so a line stamped out of order never
    /// winds the clock back. An empty transcript raises no time flags.
    pub fn analyze(&self, transcript: &[TranscriptLine], ctx: &AnalysisContext<'_>) -> ConversationState {
        let valid: Vec<&TranscriptLine> = transcript
            .iter()
            .filter(|line| match AnalyzerInputError::check(line) {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping transcript line for analysis");
                    false
                }
            })
            .collect();

        let elapsed_minutes = transcript
            .iter()
            .map(|line| *line.timestamp())
            .max()
            .map(|latest| latest.minutes_since(&ctx.start_time))
            .unwrap_or(0.0);

        let conversational: Vec<&TranscriptLine> = valid
            .iter()
            .copied()
            .filter(|line| line.speaker() != Speaker::Coach)
            .collect();

        let phase = self.infer_phase(&conversational);

        let rapport_score = RapportScorer::score(
            valid.iter().map(|line| (line.speaker(), line.text())),
            ctx.prior_rapport,
        );

        let counterpart: Vec<&str> = valid
            .iter()
            .filter(|line| line.speaker() == Speaker::Counterpart)
            .map(|line| line.text())
            .collect();

        let latest_user = valid
            .iter()
            .rev()
            .find(|line| line.speaker() == Speaker::User)
            .map(|line| line.text());

        let sentiment = counterpart
            .last()
            .map(|text| Sentiment::classify(text))
            .unwrap_or_default();

        let passion_hit = latest_user
            .map(|text| ctx.persona.mentions_passion(text))
            .unwrap_or(false);
        let passion_already_shared = counterpart
            .iter()
            .any(|text| ctx.persona.mentions_passion(text));

        let conversation_text = conversational
            .iter()
            .map(|line| line.text())
            .collect::<Vec<_>>()
            .join("\n");
        let needs_detected = ctx.persona.pain_points_in(&conversation_text);
        let objections_raised = ctx.persona.objections_in(&counterpart.join("\n"));

        let outcome_start = counterpart.len().saturating_sub(self.settings.outcome_window);
        let assessment = if counterpart.is_empty() {
            OutcomeAssessment::default()
        } else {
            OutcomeClassifier::classify(&counterpart[outcome_start..], rapport_score)
        };

        let flags = if transcript.is_empty() {
            BudgetFlags::default()
        } else {
            ctx.budget.assess(elapsed_minutes)
        };

        ConversationState {
            phase,
            rapport_score,
            cooperation_factor: RapportScorer::cooperation_factor(rapport_score),
            sentiment,
            passion_hit,
            passion_already_shared,
            needs_detected,
            objections_raised,
            outcome: assessment.outcome,
            outcome_confidence: assessment.confidence,
            elapsed_minutes,
            time_warning: flags.time_warning,
            force_wrap_up: flags.force_wrap_up,
            turn_count: transcript.len(),
            skipped_lines: transcript.len() - valid.len(),
        }
    }

    /// State after every prefix, oldest first. Used for debrief timelines.
    pub fn replay(&self, transcript: &[TranscriptLine], ctx: &AnalysisContext<'_>) -> Vec<ConversationState> {
        let mut prior = ctx.prior_rapport;
        (1..=transcript.len())
            .map(|end| {
                let state = self.analyze(
                    &transcript[..end],
                    &AnalysisContext {
                        prior_rapport: prior,
                        ..*ctx
                    },
                );
                prior = state.rapport_score;
                state
            })
            .collect()
    }

    /// Folds phase inference over every prefix so that a window without
    /// any vocabulary hit keeps the phase the earlier prefix produced.
    ///
    /// # Cost
    /// Each call replays the whole transcript: O(n * window) pattern scans,
    /// so a session of n submits pays O(n² * window) overall. Sessions are
    /// bounded by their time budget, which keeps n in the low hundreds.
    fn infer_phase(&self, lines: &[&TranscriptLine]) -> CallPhase {
        let mut phase = CallPhase::Rapport;
        for end in 1..=lines.len() {
            let start = end.saturating_sub(self.settings.phase_window);
            let window: Vec<&str> = lines[start..end].iter().map(|line| line.text()).collect();
            phase = PhaseClassifier::infer(&window, phase);
        }
        phase
    }
}
