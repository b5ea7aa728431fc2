//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - Scripted completion and transcription services
//! - `storage` - Transcript stores (in-memory, YAML files)
//! - `wire` - Turn submission DTOs and handler

pub mod ai;
pub mod storage;
pub mod wire;
