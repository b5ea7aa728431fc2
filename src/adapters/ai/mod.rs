//! AI Adapters
//!
//! Test doubles for the completion and transcription ports. Real provider
//! clients plug in behind the same traits.

mod mock_completion;

pub use mock_completion::{MockCompletionService, MockTranscriptionService, DEFAULT_MOCK_REPLY};
