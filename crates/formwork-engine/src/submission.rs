//! # Submission Orchestrator
//!
//! One independent asynchronous workflow per submit request. Unlike
//! validation there is no cancellation: every submit runs to completion,
//! and submits for different forms never block each other.
//!
//! A workflow dispatches the caller's submit action verbatim, races the
//! first matching success/failure completion, publishes the terminal
//! state action, and finally invokes the caller's callback outside the
//! state tree.

use formwork_actions::{ActionFilter, FormAction, SubmitErrors, SubmitPayload};
use formwork_bus::{ActionBus, ActionPublisher, Subscription};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, trace};

/// Watch the action stream for submit requests.
///
/// The request subscription is created by the engine before this task is
/// spawned. Runs until the bus closes; dropping the task's `JoinSet`
/// aborts workflows still waiting on a completion.
pub(crate) async fn watch(bus: Arc<ActionBus>, mut requests: Subscription) {
    let mut workflows = JoinSet::new();

    while let Some(action) = requests.recv().await {
        // The Submission topic also carries our own terminal actions
        let FormAction::Submit(payload) = action else {
            continue;
        };

        debug!(form = %payload.id, effect = %payload.action.action_type, "Submission requested");

        // Subscribe to the completion pair before the external action is
        // dispatched, so an immediate completion cannot be missed
        let completions = bus.subscribe(ActionFilter::completions(vec![
            payload.meta.route.success_action_type.clone(),
            payload.meta.route.failure_action_type.clone(),
        ]));

        workflows.spawn(run_submission(bus.clone(), completions, payload));

        // Reap settled workflows
        while workflows.try_join_next().is_some() {}
    }

    trace!("Action bus closed, submission orchestrator stopping");
}

/// Dispatch the caller's submit action and race its completion signals.
async fn run_submission(bus: Arc<ActionBus>, mut completions: Subscription, payload: SubmitPayload) {
    // Dispatch the caller-supplied action verbatim
    bus.publish(FormAction::External(payload.action.clone())).await;

    loop {
        let Some(action) = completions.recv().await else {
            return;
        };
        let FormAction::External(ext) = action else {
            continue;
        };

        if ext.action_type == payload.meta.route.success_action_type {
            debug!(form = %payload.id, "Submission succeeded");
            bus.publish(FormAction::SubmitSuccessful {
                id: payload.id.clone(),
                data: ext.payload.clone(),
            })
            .await;
            // Callback runs after the terminal action so the caller
            // observes settled state
            if let Some(cb) = &payload.meta.on_submit_success {
                cb.invoke(&ext.payload);
            }
            return;
        }

        if ext.action_type == payload.meta.route.failure_action_type {
            let errors = SubmitErrors::from_envelope(&ext.payload);
            debug!(form = %payload.id, "Submission failed");
            bus.publish(FormAction::SubmitFailed {
                id: payload.id.clone(),
                errors,
            })
            .await;
            if let Some(cb) = &payload.meta.on_submit_failure {
                cb.invoke(&ext.payload);
            }
            return;
        }
    }
}
