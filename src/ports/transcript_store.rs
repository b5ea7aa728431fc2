//! Transcript Store Port - Persistence of transcript lines and annotations.
//!
//! Stores flat serializable records keyed by session. The live registry is
//! the source of truth during a call; the store exists for debriefs and
//! recovery, so callers treat its failures as non-fatal.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::transcript::{CoachingIntervention, TranscriptLine};

/// Errors that can occur during transcript storage operations.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptStoreError {
    #[error("Transcript not found for session: {0}")]
    NotFound(SessionId),

    #[error("Failed to serialize record: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize record: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting transcripts.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Append one transcript line.
    async fn append_line(
        &self,
        session_id: SessionId,
        line: &TranscriptLine,
    ) -> Result<(), TranscriptStoreError>;

    /// Append one coaching intervention.
    async fn append_intervention(
        &self,
        session_id: SessionId,
        intervention: &CoachingIntervention,
    ) -> Result<(), TranscriptStoreError>;

    /// Load the transcript in sequence order.
    ///
    /// # Errors
    /// Returns `TranscriptStoreError::NotFound` if nothing was stored.
    async fn load_transcript(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<TranscriptLine>, TranscriptStoreError>;

    /// Load interventions in creation order. Empty if none were stored.
    async fn load_interventions(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<CoachingIntervention>, TranscriptStoreError>;
}
