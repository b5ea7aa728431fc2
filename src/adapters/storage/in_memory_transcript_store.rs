//! In-Memory Transcript Store Adapter
//!
//! Keeps transcript lines and interventions in memory.
//! Default store for development and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::transcript::{CoachingIntervention, TranscriptLine};
use crate::ports::{TranscriptStore, TranscriptStoreError};

/// In-memory storage for transcripts
#[derive(Debug, Clone, Default)]
pub struct InMemoryTranscriptStore {
    lines: Arc<RwLock<HashMap<SessionId, Vec<TranscriptLine>>>>,
    interventions: Arc<RwLock<HashMap<SessionId, Vec<CoachingIntervention>>>>,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions with at least one stored line
    pub async fn session_count(&self) -> usize {
        self.lines.read().await.len()
    }

    /// Total number of stored lines across sessions
    pub async fn line_count(&self) -> usize {
        self.lines.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscriptStore {
    async fn append_line(
        &self,
        session_id: SessionId,
        line: &TranscriptLine,
    ) -> Result<(), TranscriptStoreError> {
        let mut lines = self.lines.write().await;
        lines.entry(session_id).or_default().push(line.clone());
        Ok(())
    }

    async fn append_intervention(
        &self,
        session_id: SessionId,
        intervention: &CoachingIntervention,
    ) -> Result<(), TranscriptStoreError> {
        let mut interventions = self.interventions.write().await;
        interventions
            .entry(session_id)
            .or_default()
            .push(intervention.clone());
        Ok(())
    }

    async fn load_transcript(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<TranscriptLine>, TranscriptStoreError> {
        let lines = self.lines.read().await;
        let mut transcript = lines
            .get(&session_id)
            .cloned()
            .ok_or(TranscriptStoreError::NotFound(session_id))?;
        transcript.sort_by_key(TranscriptLine::sequence);
        Ok(transcript)
    }

    async fn load_interventions(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<CoachingIntervention>, TranscriptStoreError> {
        let interventions = self.interventions.read().await;
        Ok(interventions.get(&session_id).cloned().unwrap_or_default())
    }
}
