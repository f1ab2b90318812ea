//! # Engine
//!
//! Wires the store task and the two orchestrators onto one action bus and
//! hands the caller a dispatch/snapshot handle. One engine owns one state
//! tree; there is no global singleton.

use crate::error::EngineError;
use crate::{store, submission, validation};
use formwork_actions::{ActionFilter, ActionTopic, FormAction};
use formwork_bus::{ActionBus, ActionPublisher};
use formwork_state::{FormsState, RuleRegistry};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Handle to a running Formwork engine.
///
/// Dispatch actions with [`Engine::dispatch`], read immutable snapshots
/// with [`Engine::state`], and await conditions with [`Engine::wait_for`].
/// All subscriptions are created before `start` returns, so an action
/// dispatched immediately afterwards cannot be missed by any task.
pub struct Engine {
    bus: Arc<ActionBus>,
    snapshots: watch::Receiver<FormsState>,
    store: JoinHandle<Result<(), EngineError>>,
    validation: JoinHandle<()>,
    submission: JoinHandle<()>,
}

impl Engine {
    /// Start an engine with the builtin rule registry.
    #[must_use]
    pub fn start() -> Self {
        Self::with_rules(RuleRegistry::builtin())
    }

    /// Start an engine with a caller-assembled rule registry.
    #[must_use]
    pub fn with_rules(rules: RuleRegistry) -> Self {
        Self::with_bus(Arc::new(ActionBus::new()), rules)
    }

    /// Start an engine on an existing bus.
    ///
    /// Useful when the caller's transport layer already publishes and
    /// consumes external actions on a bus of its own.
    #[must_use]
    pub fn with_bus(bus: Arc<ActionBus>, rules: RuleRegistry) -> Self {
        // Subscribe everything up front; spawned tasks must not race the
        // caller's first dispatch
        let store_sub = bus.subscribe(ActionFilter::all());
        let validation_sub = bus.subscribe(ActionFilter::topics(vec![ActionTopic::Validation]));
        let submission_sub = bus.subscribe(ActionFilter::topics(vec![ActionTopic::Submission]));

        let (tx, snapshots) = watch::channel(FormsState::default());

        let store = tokio::spawn(store::run(store_sub, tx, rules));
        let validation = tokio::spawn(validation::watch(bus.clone(), validation_sub));
        let submission = tokio::spawn(submission::watch(bus.clone(), submission_sub));

        info!("Formwork engine started");

        Self {
            bus,
            snapshots,
            store,
            validation,
            submission,
        }
    }

    /// Dispatch an action into the ordered stream.
    ///
    /// Returns the number of active subscribers that received it.
    pub async fn dispatch(&self, action: FormAction) -> usize {
        self.bus.publish(action).await
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> FormsState {
        self.snapshots.borrow().clone()
    }

    /// A watch receiver over state snapshots, for external view layers.
    #[must_use]
    pub fn snapshots(&self) -> watch::Receiver<FormsState> {
        self.snapshots.clone()
    }

    /// The underlying bus, for transport layers that answer external
    /// actions with completion signals.
    #[must_use]
    pub fn bus(&self) -> Arc<ActionBus> {
        self.bus.clone()
    }

    /// Wait until a snapshot satisfies the predicate and return it.
    ///
    /// Returns the last observed snapshot if the store stops first.
    /// Callers own the timeout policy.
    pub async fn wait_for(&self, predicate: impl Fn(&FormsState) -> bool) -> FormsState {
        let mut rx = self.snapshots.clone();
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if predicate(&snapshot) {
                    return snapshot.clone();
                }
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
        }
    }

    /// Stop the engine and surface the store's verdict.
    ///
    /// Orchestrators and their in-flight workflows are aborted; the store
    /// drains the already-closed stream and reports any configuration
    /// error it halted on. The stream only closes once every handle from
    /// [`Engine::bus`] has been dropped, so transport layers must release
    /// theirs before awaiting this.
    ///
    /// # Errors
    ///
    /// [`EngineError::Configuration`] if the store halted on an
    /// unresolvable validator; [`EngineError::StoreStopped`] if the store
    /// task died without a verdict.
    pub async fn shutdown(self) -> Result<(), EngineError> {
        self.validation.abort();
        self.submission.abort();
        let _ = self.validation.await;
        let _ = self.submission.await;

        // Last bus handle gone, the store's stream ends
        drop(self.bus);

        match self.store.await {
            Ok(verdict) => verdict,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(_) => Err(EngineError::StoreStopped),
        }
    }
}
