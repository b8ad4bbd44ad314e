//! Error types raised while a tick is executing.

use crate::id::AgentId;

/// Errors from the model during `step()`.
///
/// A `StepError` terminates the current tick. The model is left
/// consistent (deferred mutations already queued are still applied)
/// and the caller decides whether to keep running.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    /// An agent's movement policy names a strategy the engine does not
    /// implement. Raised before any grid mutation.
    #[error("agent {agent}: unsupported movement method '{policy}'")]
    UnsupportedMovement {
        /// The agent whose move step failed.
        agent: AgentId,
        /// The requested policy name.
        policy: String,
    },
}
