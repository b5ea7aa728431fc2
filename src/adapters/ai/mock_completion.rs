//! Mock completion and transcription services for testing.
//!
//! Scripted replies are consumed in order; every request is recorded so
//! tests can assert on the prompt the caller built.
//!
//! # Example
//!
//! ```ignore
//! let completion = Arc::new(
//!     MockCompletionService::new()
//!         .with_response("Doing well, thanks! How about you?")
//!         .with_error(CompletionError::Unavailable("down".into())),
//! );
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::ports::{
    CompletionError, CompletionRequest, CompletionService, TranscriptionError,
    TranscriptionService,
};

/// Reply used once the script runs out.
pub const DEFAULT_MOCK_REPLY: &str = "Mock response";

/// Mock completion service.
#[derive(Debug, Default)]
pub struct MockCompletionService {
    responses: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<CompletionRequest>>,
    delay: Duration,
}

impl MockCompletionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_response(mut self, content: impl Into<String>) -> Self {
        self.responses.get_mut().push_back(Ok(content.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(mut self, error: CompletionError) -> Self {
        self.responses.get_mut().push_back(Err(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub async fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.calls.lock().await.push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_MOCK_REPLY.to_string()))
    }
}

/// Mock transcription service.
///
/// Transcription returns the queued transcripts in order; synthesis echoes
/// the text back as bytes.
#[derive(Debug, Default)]
pub struct MockTranscriptionService {
    transcripts: Mutex<VecDeque<Result<String, TranscriptionError>>>,
}

impl MockTranscriptionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transcript(mut self, text: impl Into<String>) -> Self {
        self.transcripts.get_mut().push_back(Ok(text.into()));
        self
    }

    pub fn with_error(mut self, error: TranscriptionError) -> Self {
        self.transcripts.get_mut().push_back(Err(error));
        self
    }
}

#[async_trait]
impl TranscriptionService for MockTranscriptionService {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, TranscriptionError> {
        if audio.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }
        self.transcripts
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(String::from_utf8_lossy(audio).into_owned()))
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TranscriptionError> {
        Ok(text.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ChatMessage;

    fn request() -> CompletionRequest {
        CompletionRequest::new("You are a buyer.").with_message(ChatMessage::user("Hello"))
    }

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let mock = MockCompletionService::new()
            .with_response("first")
            .with_response("second");

        assert_eq!(mock.complete(request()).await.unwrap(), "first");
        assert_eq!(mock.complete(request()).await.unwrap(), "second");
        assert_eq!(mock.complete(request()).await.unwrap(), DEFAULT_MOCK_REPLY);
    }

    #[tokio::test]
    async fn errors_are_injected() {
        let mock = MockCompletionService::new().with_error(CompletionError::EmptyReply);
        assert_eq!(mock.complete(request()).await, Err(CompletionError::EmptyReply));
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let mock = MockCompletionService::new();
        mock.complete(request()).await.unwrap();

        let calls = mock.calls().await;
        assert_eq!(mock.call_count().await, 1);
        assert_eq!(calls[0].system_prompt, "You are a buyer.");
    }

    #[tokio::test]
    async fn delay_is_applied() {
        let mock = MockCompletionService::new().with_delay(Duration::from_millis(20));
        let start = std::time::Instant::now();
        mock.complete(request()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn transcription_rejects_empty_audio() {
        let mock = MockTranscriptionService::new();
        assert_eq!(mock.transcribe(&[]).await, Err(TranscriptionError::EmptyAudio));
    }

    #[tokio::test]
    async fn transcription_falls_back_to_lossy_text() {
        let mock = MockTranscriptionService::new().with_transcript("scripted");
        assert_eq!(mock.transcribe(b"scripted audio").await.unwrap(), "scripted");
        assert_eq!(mock.transcribe(b"raw").await.unwrap(), "raw");
        assert_eq!(mock.synthesize("hi").await.unwrap(), b"hi".to_vec());
    }
}
