//! Application layer - orchestration over the domain and ports.
//!
//! - `SessionRegistry` - live sessions, lifecycle commands, eviction
//! - `TurnLogger` - append, re-analyse, persist
//! - `DualAgentService` - buyer and coach replies through the completion port
//! - `PromptContext` - analysis values for prompt construction

mod dual_agent;
mod prompt_context;
mod registry;
mod turn_logger;

pub use dual_agent::{AgentError, DualAgentService};
pub use prompt_context::PromptContext;
pub use registry::{
    RegistrySettings, SessionOptions, SessionRegistry, SessionSummary,
    DEFAULT_EVICTION_GRACE_SECS, MAX_BUDGET_MINUTES, MIN_BUDGET_MINUTES,
};
pub use turn_logger::{TurnLogger, TurnOutcome};
