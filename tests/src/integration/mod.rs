//! # Integration Tests
//!
//! Cross-crate choreography: actions dispatched into a running
//! [`formwork_engine::Engine`], external effects answered by a simulated
//! transport, and outcomes observed through state snapshots.

pub mod form_lifecycle;
pub mod submission_flow;

#[cfg(test)]
pub(crate) mod harness {
    use formwork_actions::{ActionFilter, AttachPayload, ExternalAction, FormAction};
    use formwork_bus::{ActionBus, ActionPublisher, Subscription};
    use formwork_engine::{Engine, EngineError};
    use formwork_state::FormsState;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    const TICK: Duration = Duration::from_secs(1);

    /// Install a per-process tracing subscriber honoring `RUST_LOG`.
    ///
    /// Lossy on purpose: only the first test to call this wins, which is
    /// all that log inspection during a failing run needs.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// An engine plus a simulated transport layer.
    ///
    /// The transport subscribes to the full action stream, waits for the
    /// external effects the orchestrators dispatch, and answers them with
    /// completion signals the way a real API client would.
    pub struct TestHarness {
        pub engine: Engine,
        bus: Arc<ActionBus>,
        transport: Subscription,
    }

    impl TestHarness {
        pub fn start() -> Self {
            init_tracing();
            let engine = Engine::start();
            let bus = engine.bus();
            let transport = bus.subscribe(ActionFilter::all());
            Self {
                engine,
                bus,
                transport,
            }
        }

        pub async fn dispatch(&self, action: FormAction) {
            self.engine.dispatch(action).await;
        }

        /// Wait for the external effect with the given action type and
        /// return it, skipping unrelated traffic on the stream.
        pub async fn expect_effect(&mut self, action_type: &str) -> ExternalAction {
            loop {
                let action = timeout(TICK, self.transport.recv())
                    .await
                    .unwrap_or_else(|_| panic!("timed out waiting for effect {action_type}"))
                    .expect("action stream closed");
                if let FormAction::External(ext) = action {
                    if ext.action_type == action_type {
                        return ext;
                    }
                }
            }
        }

        /// Publish a completion signal, as the transport's answer to a
        /// previously observed effect.
        pub async fn complete(&self, action_type: &str, payload: Value) {
            self.bus
                .publish(FormAction::External(ExternalAction::with_payload(
                    action_type,
                    payload,
                )))
                .await;
        }

        /// Wait until a snapshot satisfies the predicate; panics on timeout.
        pub async fn settled(&self, predicate: impl Fn(&FormsState) -> bool) -> FormsState {
            timeout(TICK, self.engine.wait_for(predicate))
                .await
                .expect("state never satisfied predicate")
        }

        /// Release transport handles and shut the engine down.
        pub async fn finish(self) -> Result<(), EngineError> {
            drop(self.transport);
            drop(self.bus);
            self.engine.shutdown().await
        }
    }

    /// Shorthand for the attach action used across the suite.
    pub fn attach(id: &str, name: &str, validation: Option<&str>) -> FormAction {
        FormAction::AttachToForm(AttachPayload {
            id: id.to_string(),
            name: name.to_string(),
            initial_value: None,
            validation: validation.map(str::to_string),
            async_validators: None,
        })
    }
}
