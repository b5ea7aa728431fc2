//! Transcript storage configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::storage::{FileTranscriptStore, InMemoryTranscriptStore};
use crate::ports::TranscriptStore;

use super::error::ValidationError;

/// Transcript storage configuration
///
/// Transcripts go to YAML files when `transcript_dir` is set, otherwise
/// they are kept in memory.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    pub transcript_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Build the configured store
    pub fn build_store(&self) -> Arc<dyn TranscriptStore> {
        match &self.transcript_dir {
            Some(dir) => Arc::new(FileTranscriptStore::new(dir)),
            None => Arc::new(InMemoryTranscriptStore::new()),
        }
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.transcript_dir {
            Some(dir) if dir.as_os_str().is_empty() => Err(ValidationError::EmptyTranscriptDir),
            _ => Ok(()),
        }
    }
}
