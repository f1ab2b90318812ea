//! # formwork-actions
//!
//! The action vocabulary for the Formwork engine.
//!
//! Every state transition in the engine is driven by exactly one
//! [`FormAction`] flowing through the action bus. Reducers fold over this
//! stream; the orchestrators watch it and publish follow-up actions back
//! into it. Nothing else mutates state.
//!
//! ## Action Flow
//!
//! ```text
//! ┌──────────────┐                     ┌──────────────┐
//! │ Caller / UI  │     dispatch()      │  Reducers    │
//! │              │ ──────┐             │ (store task) │
//! └──────────────┘       │             └──────────────┘
//!                        ▼                     ↑
//!                  ┌──────────────┐            │
//!                  │  Action Bus  │ ───────────┘
//!                  │              │ ───────────┐
//!                  └──────────────┘            ▼
//!                        ↑             ┌──────────────┐
//!                        └──────────── │ Orchestrators│
//!                          completions └──────────────┘
//! ```
//!
//! External effects (validation calls, submission transport) never appear
//! here as closures over I/O; they are opaque [`ExternalAction`] values that
//! the caller's transport layer recognizes and eventually answers with a
//! named completion signal on the same bus.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod action;
pub mod payloads;

// Re-export main types
pub use action::{ActionFilter, ActionTopic, FormAction};
pub use payloads::{
    AttachPayload, CompletionRoute, ExternalAction, SubmitCallback, SubmitErrors, SubmitMeta,
    SubmitPayload, ValidationRequestPayload,
};
