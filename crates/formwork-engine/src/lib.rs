//! # formwork-engine
//!
//! Runtime wiring for the Formwork engine.
//!
//! ## Role in System
//!
//! - **Store Task**: the single writer. Subscribes to the full action
//!   stream, folds the registry reducer over it in dispatch order, and
//!   publishes every new snapshot over a `tokio::sync::watch` channel.
//! - **Validation Orchestrator**: one cancellable workflow per
//!   `(form, field, validator)` key; latest request wins, stale
//!   completions are discarded.
//! - **Submission Orchestrator**: one independent workflow per submit
//!   request; workflows run to completion and are never cancelled by
//!   later submits.
//!
//! ## Choreography Flow
//!
//! ```text
//! [Caller] ──Submit/RequestAsyncValidation──→ [Action Bus]
//!                                                  │
//!                        ┌─────────────────────────┼──────────────┐
//!                        ↓                         ↓              ↓
//!                  [Store task]        [Orchestrator watchers]  [Transport]
//!                        │                         │              │
//!                    snapshots             External(effect) ──────┘
//!                        │                         ↑
//!                        ↓                  completion signal
//!                  watch channel                   │
//!                                   terminal actions back to the bus
//! ```
//!
//! The orchestrators suspend only while waiting for a completion signal;
//! all state transitions stay synchronous inside the store. A completion
//! that never arrives leaves the corresponding in-flight flag set; timeout
//! and backpressure belong to the external transport, not this crate.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod engine;
pub mod error;
mod store;
mod submission;
mod validation;

// Re-export main types
pub use engine::Engine;
pub use error::EngineError;
