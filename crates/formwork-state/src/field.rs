//! # Field Entity Reducer
//!
//! Pure state machine for a single field: value, touch tracking, and three
//! independent error categories. Sync errors are recomputed by the form's
//! revalidation pass; async and server errors arrive via orchestrated
//! completion actions. Error sets hold validator names, never messages.

use crate::validators::{
    parse_async_validators, parse_sync_validators, AsyncValidator, SyncValidator,
};
use formwork_actions::FormAction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// State of one named, independently validated input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within its form.
    pub name: String,
    /// Current value.
    pub value: String,
    /// Parsed synchronous validators, in source order.
    pub sync_validators: Vec<SyncValidator>,
    /// Names of currently failing sync validators.
    pub sync_errors: BTreeSet<String>,
    /// Attached asynchronous validators with their in-flight flags.
    pub async_validators: Vec<AsyncValidator>,
    /// Names of async validators whose last completion was a failure.
    pub async_errors: BTreeSet<String>,
    /// Error names reported by the server for this field on submit failure.
    pub server_errors: BTreeSet<String>,
    /// True whenever sync validity may be stale relative to the current
    /// value or a dependency field's value.
    pub needs_validation: bool,
    /// True once the field has been blurred or explicitly touched.
    pub touched: bool,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: String::new(),
            sync_validators: Vec::new(),
            sync_errors: BTreeSet::new(),
            async_validators: Vec::new(),
            async_errors: BTreeSet::new(),
            server_errors: BTreeSet::new(),
            // A field that has never been validated is stale by definition
            needs_validation: true,
            touched: false,
        }
    }
}

/// Whether a change to `changed_name`/`changed_value` leaves this field's
/// sync validity stale.
///
/// True if the field already needed validation; or the changed field is
/// this field and the value actually changed; or any of this field's sync
/// validators references `changed_name` as a parameter. The last clause is
/// how editing a `password` field marks its `confirm` sibling stale.
#[must_use]
pub fn field_needs_validation(field: &Field, changed_name: &str, changed_value: &str) -> bool {
    field.needs_validation
        || (field.name == changed_name && field.value != changed_value)
        || field
            .sync_validators
            .iter()
            .any(|v| v.params.iter().flatten().any(|p| p == changed_name))
}

/// Apply one action to a field, producing the next field snapshot.
///
/// Actions that do not concern fields pass through unchanged. Routing
/// decisions (which fields see which actions) belong to the form reducer;
/// this function only guards the per-field conditions (touch targeting,
/// clear targeting, validator-name matching).
#[must_use]
pub fn reduce(mut state: Field, action: &FormAction) -> Field {
    match action {
        FormAction::AttachToForm(payload) => {
            state.name = payload.name.clone();
            if let Some(initial) = payload
                .initial_value
                .as_deref()
                .filter(|v| !v.is_empty())
            {
                state.value = initial.to_string();
            }
            // Re-attaching without validator inputs keeps prior validators
            if let Some(validation) = payload.validation.as_deref() {
                state.sync_validators = parse_sync_validators(validation.trim_matches('|'));
            }
            if let Some(names) = payload.async_validators.as_deref() {
                state.async_validators = parse_async_validators(names);
            }
            state
        }

        FormAction::Blur { .. } => {
            state.touched = true;
            state
        }

        FormAction::Touch { fields, .. } => {
            // Touch everything when no fields are named, otherwise only
            // a field the action names
            if fields.as_ref().is_none_or(|f| f.contains(&state.name)) {
                state.touched = true;
            }
            state
        }

        FormAction::Change { name, value, .. } => {
            // A new value invalidates prior async and server verdicts but
            // not sync errors, which the form-level pass recomputes
            state.needs_validation = field_needs_validation(&state, name, value);
            state.value = value.clone();
            state.async_errors.clear();
            state.server_errors.clear();
            state
        }

        FormAction::Submit(_) => {
            state.server_errors.clear();
            state
        }

        // Uniform dispatch; nothing to update per field on success
        FormAction::SubmitSuccessful { .. } => state,

        FormAction::SubmitFailed { errors, .. } => {
            state.server_errors = errors
                .for_field(&state.name)
                .iter()
                .cloned()
                .collect();
            state
        }

        FormAction::RequestAsyncValidation(payload) => {
            for v in &mut state.async_validators {
                if v.name == payload.validator {
                    v.is_validating = true;
                }
            }
            // Optimistic clear while the request is in flight; a request
            // has been issued, so the field is no longer stale
            state.async_errors.remove(&payload.validator);
            state.needs_validation = false;
            state
        }

        FormAction::NoAsyncErrors { validator, .. } => {
            for v in &mut state.async_validators {
                if v.name == *validator {
                    v.is_validating = false;
                }
            }
            state.async_errors.remove(validator);
            state
        }

        FormAction::ReceiveAsyncErrors { validator, .. } => {
            for v in &mut state.async_validators {
                if v.name == *validator {
                    v.is_validating = false;
                }
            }
            state.async_errors.insert(validator.clone());
            state
        }

        FormAction::ClearForm { fields, .. } => {
            if fields.as_ref().is_none_or(|f| f.contains(&state.name)) {
                state.value.clear();
                state.sync_errors.clear();
                state.async_errors.clear();
                state.server_errors.clear();
            }
            state
        }

        _ => state,
    }
}
