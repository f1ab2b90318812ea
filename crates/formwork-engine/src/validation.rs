//! # Validation Orchestrator
//!
//! One cancellable asynchronous workflow per validation request. Each
//! request dispatches the caller-supplied external action verbatim, then
//! races the first matching success/failure completion signal and
//! translates it into an error-state update.
//!
//! Cancellation policy is "latest wins" per `(form, field, validator)`
//! key: a newer request for the same key aborts the prior waiter, and a
//! generation check discards any completion a dying waiter managed to
//! observe first. Requests for different keys run fully concurrently.

use formwork_actions::{ActionFilter, FormAction, ValidationRequestPayload};
use formwork_bus::{ActionBus, ActionPublisher, Subscription};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, trace};

/// Scope of the latest-wins discipline.
type ValidationKey = (String, String, String);

/// Watch the action stream for validation requests.
///
/// The request subscription is created by the engine before this task is
/// spawned, so no request dispatched after engine startup can be missed.
/// Runs until the bus closes. Dropping the task's `JoinSet` aborts every
/// in-flight waiter.
pub(crate) async fn watch(bus: Arc<ActionBus>, mut requests: Subscription) {
    let mut waiters = JoinSet::new();
    let mut active: HashMap<ValidationKey, AbortHandle> = HashMap::new();
    let generations: Arc<Mutex<HashMap<ValidationKey, u64>>> = Arc::new(Mutex::new(HashMap::new()));
    let mut next_generation: u64 = 0;

    while let Some(action) = requests.recv().await {
        // The Validation topic also carries the terminal actions our own
        // waiters publish; only requests start workflows
        let FormAction::RequestAsyncValidation(payload) = action else {
            continue;
        };

        let key: ValidationKey = (
            payload.id.clone(),
            payload.name.clone(),
            payload.validator.clone(),
        );
        next_generation += 1;

        debug!(
            form = %key.0,
            field = %key.1,
            validator = %key.2,
            generation = next_generation,
            "Validation requested"
        );

        // Subscribe to the completion pair before the external action is
        // dispatched, so an immediate completion cannot be missed
        let completions = bus.subscribe(ActionFilter::completions(vec![
            payload.meta.success_action_type.clone(),
            payload.meta.failure_action_type.clone(),
        ]));

        if let Ok(mut current) = generations.lock() {
            current.insert(key.clone(), next_generation);
        }

        let handle = waiters.spawn(await_completion(
            bus.clone(),
            completions,
            payload,
            key.clone(),
            next_generation,
            generations.clone(),
        ));

        // Latest wins: abandon the prior wait for this key
        if let Some(previous) = active.insert(key, handle) {
            previous.abort();
        }

        // Reap settled waiters
        while waiters.try_join_next().is_some() {}
    }

    trace!("Action bus closed, validation orchestrator stopping");
}

/// Dispatch the caller's action and race its completion signals.
async fn await_completion(
    bus: Arc<ActionBus>,
    mut completions: Subscription,
    payload: ValidationRequestPayload,
    key: ValidationKey,
    generation: u64,
    generations: Arc<Mutex<HashMap<ValidationKey, u64>>>,
) {
    // Dispatch the caller-supplied action verbatim
    bus.publish(FormAction::External(payload.action.clone())).await;

    let succeeded = loop {
        let Some(action) = completions.recv().await else {
            return;
        };
        let FormAction::External(ext) = action else {
            continue;
        };
        if ext.action_type == payload.meta.success_action_type {
            break true;
        }
        if ext.action_type == payload.meta.failure_action_type {
            break false;
        }
    };

    // A completion can race the abort of a superseded waiter; only the
    // newest request for this key may produce an effect
    let stale = generations
        .lock()
        .map(|current| current.get(&key) != Some(&generation))
        .unwrap_or(true);
    if stale {
        debug!(
            form = %key.0,
            field = %key.1,
            validator = %key.2,
            generation,
            "Discarding stale validation completion"
        );
        return;
    }

    let outcome = if succeeded {
        FormAction::NoAsyncErrors {
            id: payload.id,
            name: payload.name,
            validator: payload.validator,
        }
    } else {
        FormAction::ReceiveAsyncErrors {
            id: payload.id,
            name: payload.name,
            validator: payload.validator,
        }
    };
    bus.publish(outcome).await;
}
