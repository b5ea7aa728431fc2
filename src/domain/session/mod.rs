//! Session domain module.
//!
//! The `Session` aggregate is the per-call state machine: transcript,
//! lifecycle status, coach annotations and the latest analysis.

mod aggregate;
mod errors;

pub use aggregate::Session;
pub use errors::SessionError;
