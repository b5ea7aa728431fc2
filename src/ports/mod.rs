//! Ports - Interfaces to the collaborators the core depends on.
//!
//! Implementations live in `adapters`; everything here is constructor
//! injected as `Arc<dyn Trait>`.

mod completion_service;
mod transcript_store;
mod transcription_service;

pub use completion_service::{
    ChatMessage, ChatRole, CompletionError, CompletionRequest, CompletionService,
};
pub use transcript_store::{TranscriptStore, TranscriptStoreError};
pub use transcription_service::{TranscriptionError, TranscriptionService};
