//! Transcription Service Port - Speech to text and back.

use async_trait::async_trait;

/// Port for speech transcription and synthesis.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Transcribe recorded audio into text.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, TranscriptionError>;

    /// Synthesize speech for a reply.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TranscriptionError>;
}

/// Transcription errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio payload is empty")]
    EmptyAudio,

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("transcription provider unavailable: {0}")]
    Unavailable(String),
}
