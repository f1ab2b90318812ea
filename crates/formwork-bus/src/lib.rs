//! # Formwork Bus - Single Ordered Action Stream
//!
//! Every mutation of the state tree travels through this bus as a
//! [`formwork_actions::FormAction`]. The store task is the only consumer
//! that writes state; orchestrators are peers on the same stream that
//! answer requests by publishing follow-up actions.
//!
//! ## Dispatch Pattern
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Caller / UI  │                    │ Store task   │
//! │              │    publish()       │              │
//! │              │ ──────┐            └──────────────┘
//! └──────────────┘       │                    ↑
//!                        ▼                    │
//!                  ┌──────────────┐           │
//!                  │  Action Bus  │ ──────────┘
//!                  │              │ ──────────→ orchestrators
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Ordering
//!
//! The bus is a `tokio::sync::broadcast` channel: publishers are
//! serialized, and every subscriber observes actions in publish order.
//! That single total order is what makes "latest wins" cancellation and
//! the reducers' strict transition order possible without locks.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use publisher::{ActionBus, ActionPublisher};
pub use subscriber::{ActionStream, Subscription, SubscriptionError};

/// Maximum actions to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
