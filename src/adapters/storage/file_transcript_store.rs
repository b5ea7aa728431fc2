//! File-based Transcript Store Adapter
//!
//! Stores every transcript line and intervention as its own YAML document.
//! Layout under the base directory:
//!
//! ```text
//! <session_id>/lines/000000.yaml
//! <session_id>/interventions/000000-<intervention_id>.yaml
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::SessionId;
use crate::domain::transcript::{CoachingIntervention, TranscriptLine};
use crate::ports::{TranscriptStore, TranscriptStoreError};

/// File-based storage for transcripts
#[derive(Debug, Clone)]
pub struct FileTranscriptStore {
    base_path: PathBuf,
}

impl FileTranscriptStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileTranscriptStore::new("./data/transcripts");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn session_dir(&self, session_id: SessionId) -> PathBuf {
        self.base_path.join(session_id.to_string())
    }

    fn lines_dir(&self, session_id: SessionId) -> PathBuf {
        self.session_dir(session_id).join("lines")
    }

    fn interventions_dir(&self, session_id: SessionId) -> PathBuf {
        self.session_dir(session_id).join("interventions")
    }

    async fn ensure_dir(&self, path: &Path) -> Result<(), TranscriptStoreError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| TranscriptStoreError::IoError(e.to_string()))
    }

    /// YAML files in `dir`, sorted by file name.
    async fn yaml_files(dir: &Path) -> Result<Vec<PathBuf>, TranscriptStoreError> {
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| TranscriptStoreError::IoError(e.to_string()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TranscriptStoreError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("yaml") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    async fn read_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, TranscriptStoreError> {
        let mut records = Vec::new();
        for path in Self::yaml_files(dir).await? {
            let yaml = fs::read_to_string(&path)
                .await
                .map_err(|e| TranscriptStoreError::IoError(e.to_string()))?;
            let record = serde_yaml::from_str(&yaml)
                .map_err(|e| TranscriptStoreError::DeserializationFailed(e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait]
impl TranscriptStore for FileTranscriptStore {
    async fn append_line(
        &self,
        session_id: SessionId,
        line: &TranscriptLine,
    ) -> Result<(), TranscriptStoreError> {
        let dir = self.lines_dir(session_id);
        self.ensure_dir(&dir).await?;

        let yaml = serde_yaml::to_string(line)
            .map_err(|e| TranscriptStoreError::SerializationFailed(e.to_string()))?;

        fs::write(dir.join(format!("{:06}.yaml", line.sequence())), yaml)
            .await
            .map_err(|e| TranscriptStoreError::IoError(e.to_string()))
    }

    async fn append_intervention(
        &self,
        session_id: SessionId,
        intervention: &CoachingIntervention,
    ) -> Result<(), TranscriptStoreError> {
        let dir = self.interventions_dir(session_id);
        self.ensure_dir(&dir).await?;

        let yaml = serde_yaml::to_string(intervention)
            .map_err(|e| TranscriptStoreError::SerializationFailed(e.to_string()))?;

        // Position prefix keeps creation order; appends per session are serialized.
        let position = Self::yaml_files(&dir).await?.len();
        let file_name = format!("{:06}-{}.yaml", position, intervention.id);

        fs::write(dir.join(file_name), yaml)
            .await
            .map_err(|e| TranscriptStoreError::IoError(e.to_string()))
    }

    async fn load_transcript(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<TranscriptLine>, TranscriptStoreError> {
        let dir = self.lines_dir(session_id);
        if !dir.exists() {
            return Err(TranscriptStoreError::NotFound(session_id));
        }
        Self::read_all(&dir).await
    }

    async fn load_interventions(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<CoachingIntervention>, TranscriptStoreError> {
        let dir = self.interventions_dir(session_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        Self::read_all(&dir).await
    }
}
