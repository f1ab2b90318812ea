//! # formwork-state
//!
//! Pure state machines for the Formwork engine.
//!
//! ## Role in System
//!
//! - **Single Source of Truth**: one [`FormsState`] registry owns every
//!   form; a form exists in it iff it has been registered and not yet
//!   unregistered.
//! - **Event-Sourced Reducers**: every transition is a pure function
//!   `(state, action) -> state` that consumes the old snapshot and returns
//!   a derived copy. Nothing in this crate performs I/O or suspends.
//! - **Fatal Configuration Errors**: an unresolvable validator name at
//!   validation time is a developer mistake and surfaces as
//!   [`StateError::UnknownValidator`], never as a recoverable validation
//!   failure.
//!
//! ## Reducer Routing
//!
//! ```text
//! FormAction ──→ forms::reduce (registry)
//!                    │ routes by form id, lazily creating forms
//!                    ▼
//!                form::reduce ──→ validate_form (sync revalidation)
//!                    │ routes per field or broadcasts
//!                    ▼
//!                field::reduce
//! ```
//!
//! Recoverable validation outcomes are data: sets of validator names
//! attached to the owning entity. Nothing here throws across the action
//! boundary.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod error;
pub mod field;
pub mod form;
pub mod forms;
pub mod rules;
pub mod selectors;
pub mod validators;

// Re-export main types
pub use error::StateError;
pub use field::{field_needs_validation, Field};
pub use form::{validate_form, Form};
pub use forms::FormsState;
pub use rules::{RuleFn, RuleRegistry};
pub use validators::{parse_async_validators, parse_sync_validators, AsyncValidator, SyncValidator};
