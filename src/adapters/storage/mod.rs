//! Storage Adapters
//!
//! Implementations of the TranscriptStore port.
//!
//! ## Available Adapters
//!
//! - **FileTranscriptStore** - One YAML document per record on disk
//! - **InMemoryTranscriptStore** - In memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileTranscriptStore, InMemoryTranscriptStore};
//!
//! let store = FileTranscriptStore::new("./data/transcripts");
//! let store = InMemoryTranscriptStore::new();
//! ```

mod file_transcript_store;
mod in_memory_transcript_store;

pub use file_transcript_store::FileTranscriptStore;
pub use in_memory_transcript_store::InMemoryTranscriptStore;
