//! # Store Task
//!
//! The single writer over the state tree. Reducer transitions are
//! synchronous and run to completion before the next action is taken from
//! the stream, so there is a strict total order over state mutations and
//! no locking anywhere.

use crate::error::EngineError;
use formwork_bus::Subscription;
use formwork_state::{forms, FormsState, RuleRegistry};
use tokio::sync::watch;
use tracing::{error, trace};

/// Fold the registry reducer over the action stream until the bus closes.
///
/// Every successful transition is published as a fresh snapshot on the
/// watch channel. A configuration error halts the store immediately: the
/// error is logged and returned, and no further actions are processed.
pub(crate) async fn run(
    mut actions: Subscription,
    snapshots: watch::Sender<FormsState>,
    rules: RuleRegistry,
) -> Result<(), EngineError> {
    let mut state = FormsState::default();

    while let Some(action) = actions.recv().await {
        trace!(topic = ?action.topic(), "Store applying action");

        state = match forms::reduce(state, &action, &rules) {
            Ok(next) => next,
            Err(e) => {
                error!(error = %e, "Store halted: unresolvable validator is a configuration error");
                return Err(EngineError::Configuration(e));
            }
        };

        snapshots.send_replace(state.clone());
    }

    trace!("Action bus closed, store stopping");
    Ok(())
}
