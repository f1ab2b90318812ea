use formwork_state::StateError;
use thiserror::Error;

/// Errors surfaced by the engine runtime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The store halted on a configuration error from the reducers.
    /// By contract this is fatal; a misconfigured form must never
    /// silently pass as valid.
    #[error("Store halted on configuration error: {0}")]
    Configuration(#[from] StateError),

    /// The store task terminated without reporting a reason.
    #[error("Store task terminated unexpectedly")]
    StoreStopped,
}
