use thiserror::Error;

/// Errors from state transitions.
///
/// Validation failures are never represented here; they are data attached
/// to fields and forms. This enum covers configuration mistakes only, and
/// a configuration mistake is fatal: the store halts on it rather than
/// letting an unvalidated form pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A sync-validator name could not be resolved in the rule registry.
    #[error("Validator not recognized in rule registry: {name}")]
    UnknownValidator {
        /// Canonical (camelCase) name that failed to resolve.
        name: String,
    },
}
