//! Completion Service Port - Interface for the language model behind both agents.
//!
//! The counterpart (simulated buyer) and the coach are the same kind of
//! call: a system prompt plus a role/content history in, reply text out.
//! Prompt wording is built by the caller; this port only carries it.
//!
//! # Example
//!
//! ```ignore
//! let request = CompletionRequest::new("You are Dana, a busy operations lead.")
//!     .with_message(ChatMessage::user("Hi Dana, how are you?"));
//! let reply = completion.complete(request).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for language-model completions.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generate one reply for the given prompt and history.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

/// Request for a single completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Instructions that frame the agent's behaviour.
    pub system_prompt: String,
    /// Conversation history from the agent's perspective.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature, provider default when unset.
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
            temperature: None,
        }
    }

    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A message in the agent's view of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Role of the message sender, relative to the agent being prompted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Completion errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// Provider is unavailable or timed out.
    #[error("completion provider unavailable: {0}")]
    Unavailable(String),

    /// Provider refused the request.
    #[error("completion rejected: {0}")]
    Rejected(String),

    /// Provider returned nothing usable.
    #[error("completion was empty")]
    EmptyReply,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_messages_in_order() {
        let request = CompletionRequest::new("system")
            .with_message(ChatMessage::user("hi"))
            .with_messages([ChatMessage::assistant("hello"), ChatMessage::user("how are you?")])
            .with_temperature(0.7);

        assert_eq!(request.system_prompt, "system");
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[1].role, ChatRole::Assistant);
        assert_eq!(request.temperature, Some(0.7));
    }

    #[test]
    fn chat_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }
}
