//! DualAgentService - drives the simulated buyer and the coach.
//!
//! Both agents share one completion port. The service builds each agent's
//! view of the transcript, asks for a reply and submits it through the
//! registry like any other turn, so analysis and lifecycle rules apply.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, SessionId};
use crate::domain::session::{Session, SessionError};
use crate::domain::transcript::{Speaker, TranscriptLine};
use crate::ports::{
    ChatMessage, CompletionError, CompletionRequest, CompletionService, TranscriptionError,
    TranscriptionService,
};

use super::prompt_context::PromptContext;
use super::registry::SessionRegistry;
use super::turn_logger::TurnOutcome;

/// Errors from agent orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

impl AgentError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AgentError::Session(e) => e.code(),
            AgentError::Completion(_) => ErrorCode::CompletionFailed,
            AgentError::Transcription(_) => ErrorCode::TranscriptionFailed,
        }
    }
}

pub struct DualAgentService {
    registry: Arc<SessionRegistry>,
    completion: Arc<dyn CompletionService>,
    transcription: Arc<dyn TranscriptionService>,
}

impl DualAgentService {
    pub fn new(
        registry: Arc<SessionRegistry>,
        completion: Arc<dyn CompletionService>,
        transcription: Arc<dyn TranscriptionService>,
    ) -> Self {
        Self {
            registry,
            completion,
            transcription,
        }
    }

    /// Generates and submits the buyer's next turn.
    ///
    /// # Errors
    ///
    /// - `CounterpartSilenced` outside `Active`, checked before any completion call
    /// - `Completion` when the provider fails or replies with nothing
    pub async fn counterpart_reply(&self, id: SessionId) -> Result<TurnOutcome, AgentError> {
        let session = self.snapshot(id).await?;
        if !session.status().allows_counterpart() {
            return Err(SessionError::CounterpartSilenced {
                status: session.status(),
            }
            .into());
        }

        let ctx = PromptContext::from_state(session.latest_state(), session.status(), session.persona());
        let request = CompletionRequest::new(ctx.counterpart_prompt(session.persona()))
            .with_messages(counterpart_view(session.transcript()));

        let reply = self.complete(id, request).await?;
        let line = TranscriptLine::new(Speaker::Counterpart, reply)
            .with_agent_role(session.persona().name.clone());
        Ok(self.registry.submit(id, line).await?)
    }

    /// Generates and submits a coach turn. Allowed in every non-ended status.
    pub async fn coach_reply(&self, id: SessionId) -> Result<TurnOutcome, AgentError> {
        let session = self.snapshot(id).await?;
        let ctx = PromptContext::from_state(session.latest_state(), session.status(), session.persona());
        let request = CompletionRequest::new(ctx.coach_prompt())
            .with_messages(coach_view(session.transcript()));

        let reply = self.complete(id, request).await?;
        let line = TranscriptLine::new(Speaker::Coach, reply).with_agent_role("coach");
        Ok(self.registry.submit(id, line).await?)
    }

    /// Transcribes recorded audio and submits it as a turn.
    pub async fn submit_audio(
        &self,
        id: SessionId,
        speaker: Speaker,
        audio: &[u8],
    ) -> Result<TurnOutcome, AgentError> {
        let text = self.transcription.transcribe(audio).await.map_err(|e| {
            tracing::warn!(session_id = %id, error = %e, "Transcription failed");
            e
        })?;
        Ok(self.registry.submit(id, TranscriptLine::new(speaker, text)).await?)
    }

    /// Synthesizes speech for a line.
    pub async fn speak(&self, line: &TranscriptLine) -> Result<Vec<u8>, AgentError> {
        Ok(self.transcription.synthesize(line.text()).await?)
    }

    async fn snapshot(&self, id: SessionId) -> Result<Session, SessionError> {
        self.registry
            .get(id)
            .await
            .ok_or(SessionError::not_found(id))
    }

    async fn complete(&self, id: SessionId, request: CompletionRequest) -> Result<String, CompletionError> {
        let reply = self.completion.complete(request).await.map_err(|e| {
            tracing::warn!(session_id = %id, error = %e, "Completion failed");
            e
        })?;
        if reply.trim().is_empty() {
            return Err(CompletionError::EmptyReply);
        }
        Ok(reply)
    }
}

/// The buyer's view: its own turns are the assistant, the seller is the user,
/// the coach is invisible.
fn counterpart_view(transcript: &[TranscriptLine]) -> Vec<ChatMessage> {
    transcript
        .iter()
        .filter_map(|line| match line.speaker() {
            Speaker::Counterpart => Some(ChatMessage::assistant(line.text())),
            Speaker::User => Some(ChatMessage::user(line.text())),
            Speaker::Coach => None,
        })
        .collect()
}

/// The coach's view: its own turns are the assistant, both call parties are
/// labelled user messages.
fn coach_view(transcript: &[TranscriptLine]) -> Vec<ChatMessage> {
    transcript
        .iter()
        .map(|line| match line.speaker() {
            Speaker::Coach => ChatMessage::assistant(line.text()),
            speaker => ChatMessage::user(format!("{}: {}", speaker, line.text())),
        })
        .collect()
}
