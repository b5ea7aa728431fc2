//! Transcript lines - one turn from one speaker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The trainee running the exercise.
    User,
    /// The simulated buyer persona.
    Counterpart,
    /// The observing coach persona.
    Coach,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Counterpart => "counterpart",
            Speaker::Coach => "coach",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Speaker {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Speaker::User),
            "counterpart" => Ok(Speaker::Counterpart),
            "coach" => Ok(Speaker::Coach),
            other => Err(ValidationError::invalid_format(
                "speaker",
                format!("unknown speaker '{}'", other),
            )),
        }
    }
}

/// One turn of the conversation.
///
/// Immutable once appended to a session. `sequence` is the monotonic
/// position assigned on append; `timestamp` is the wall-clock time of the
/// utterance and drives the time budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    speaker: Speaker,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    agent_role: Option<String>,
    text: String,
    timestamp: Timestamp,
    #[serde(default)]
    sequence: u64,
}

impl TranscriptLine {
    /// Creates a line stamped with the current time.
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self::at(speaker, text, Timestamp::now())
    }

    /// Creates a line with an explicit timestamp.
    pub fn at(speaker: Speaker, text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            speaker,
            agent_role: None,
            text: text.into(),
            timestamp,
            sequence: 0,
        }
    }

    /// Labels the line with the persona that produced it.
    pub fn with_agent_role(mut self, role: impl Into<String>) -> Self {
        self.agent_role = Some(role.into());
        self
    }

    pub(crate) fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn agent_role(&self) -> Option<&str> {
        self.agent_role.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Rejects lines whose text is empty or whitespace only.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        Ok(())
    }
}
