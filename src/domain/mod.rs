//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, status, errors)
//! - `transcript` - Turns and coach annotations
//! - `analysis` - Pure conversation analysis
//! - `session` - Session aggregate and lifecycle

pub mod analysis;
pub mod foundation;
pub mod session;
pub mod transcript;
