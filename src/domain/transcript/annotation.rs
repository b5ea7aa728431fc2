//! Coach annotations over a transcript range.
//!
//! Interventions and snippets are append-only: created by coach actions or
//! lifecycle transitions, never edited, never removed while the session lives.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AnnotationId, SessionStatus, Timestamp, ValidationError};

/// Half-open range `[start, end)` of transcript indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRange {
    pub start: usize,
    pub end: usize,
}

impl TranscriptRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Empty range anchored at `index`, used for point-in-time markers.
    pub fn at(index: usize) -> Self {
        Self { start: index, end: index }
    }

    /// Validates the range against a transcript of `len` lines.
    pub fn validate(&self, len: usize) -> Result<(), ValidationError> {
        if self.start > self.end {
            return Err(ValidationError::invalid_format(
                "range",
                format!("start {} is after end {}", self.start, self.end),
            ));
        }
        if self.end > len {
            return Err(ValidationError::out_of_range(
                "range.end",
                0,
                len as i64,
                self.end as i64,
            ));
        }
        Ok(())
    }
}

/// What kind of intervention was logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InterventionKind {
    /// Lifecycle change, recorded automatically.
    Transition { from: SessionStatus, to: SessionStatus },
    /// Coach nudged the user without stopping the call.
    Hint,
    /// Coach stopped the call to teach something.
    LearningMoment,
    /// Post-call or in-call feedback.
    Feedback,
}

/// Append-only coach annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingIntervention {
    pub id: AnnotationId,
    pub kind: InterventionKind,
    pub reason: String,
    pub range: TranscriptRange,
    pub created_at: Timestamp,
}

impl CoachingIntervention {
    pub fn new(kind: InterventionKind, reason: impl Into<String>, range: TranscriptRange) -> Self {
        Self {
            id: AnnotationId::new(),
            kind,
            reason: reason.into(),
            range,
            created_at: Timestamp::now(),
        }
    }

    /// Builds the audit entry for a lifecycle change.
    pub fn transition(
        from: SessionStatus,
        to: SessionStatus,
        reason: impl Into<String>,
        transcript_len: usize,
    ) -> Self {
        Self::new(
            InterventionKind::Transition { from, to },
            reason,
            TranscriptRange::at(transcript_len),
        )
    }

    pub fn is_transition(&self) -> bool {
        matches!(self.kind, InterventionKind::Transition { .. })
    }
}

/// Clip of the call the coach wants to replay in the debrief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSnippet {
    pub id: AnnotationId,
    pub title: String,
    pub range: TranscriptRange,
    pub created_at: Timestamp,
}

impl RecordingSnippet {
    pub fn new(title: impl Into<String>, range: TranscriptRange) -> Self {
        Self {
            id: AnnotationId::new(),
            title: title.into(),
            range,
            created_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_within_transcript_is_valid() {
        assert!(TranscriptRange::new(0, 3).validate(3).is_ok());
        assert!(TranscriptRange::at(3).validate(3).is_ok());
    }

    #[test]
    fn range_past_end_is_rejected() {
        assert!(TranscriptRange::new(1, 4).validate(3).is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(TranscriptRange::new(2, 1).validate(3).is_err());
    }

    #[test]
    fn transition_entry_serializes_with_tag() {
        let entry = CoachingIntervention::transition(
            SessionStatus::Active,
            SessionStatus::Paused,
            "learning moment",
            4,
        );
        assert!(entry.is_transition());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"]["type"], "transition");
        assert_eq!(json["kind"]["from"], "active");
        assert_eq!(json["kind"]["to"], "paused");
        assert_eq!(json["range"]["start"], 4);
    }
}
