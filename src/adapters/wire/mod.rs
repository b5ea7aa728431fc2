//! Wire adapter for turn submission.
//!
//! Transport-agnostic: a request DTO in, a response or error DTO out.

mod dto;
mod handlers;

pub use dto::{ErrorResponse, SubmitTurnRequest, SubmitTurnResponse};
pub use handlers::{submit_turn, submit_turn_json};
