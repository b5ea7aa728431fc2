//! Conversation analyzer configuration

use serde::Deserialize;

use crate::domain::analysis::{AnalyzerSettings, DEFAULT_OUTCOME_WINDOW, DEFAULT_PHASE_WINDOW};

use super::error::ValidationError;

/// Analyzer window configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Recent turns scored for phase inference
    #[serde(default = "default_phase_window")]
    pub phase_window: usize,

    /// Recent counterpart turns scored for outcome
    #[serde(default = "default_outcome_window")]
    pub outcome_window: usize,
}

impl AnalyzerConfig {
    pub fn settings(&self) -> AnalyzerSettings {
        AnalyzerSettings {
            phase_window: self.phase_window,
            outcome_window: self.outcome_window,
        }
    }

    /// Validate analyzer configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.phase_window == 0 || self.outcome_window == 0 {
            return Err(ValidationError::InvalidWindow);
        }
        Ok(())
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            phase_window: default_phase_window(),
            outcome_window: default_outcome_window(),
        }
    }
}

fn default_phase_window() -> usize {
    DEFAULT_PHASE_WINDOW
}

fn default_outcome_window() -> usize {
    DEFAULT_OUTCOME_WINDOW
}
