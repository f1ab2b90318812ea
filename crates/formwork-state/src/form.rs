//! # Form Entity Reducer
//!
//! Pure state machine for one form: field map, form-level server errors,
//! and the submitting flag. Per-field actions are delegated to the field
//! reducer; every attach and change ends with a full synchronous
//! revalidation pass across all fields. The pass is deterministic and
//! total, with no incremental path.

use crate::error::StateError;
use crate::field::{self, field_needs_validation, Field};
use crate::rules::RuleRegistry;
use formwork_actions::FormAction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A named collection of fields plus aggregate submission/error state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    /// Form id, unique within the registry.
    pub id: String,
    /// Attached fields, keyed by field name.
    pub fields: HashMap<String, Field>,
    /// Form-level errors of server origin.
    pub errors: BTreeSet<String>,
    /// True while a submission workflow is in flight.
    pub submitting: bool,
}

/// Snapshot of every current field value, keyed by field name.
#[must_use]
pub fn form_values(form: &Form) -> BTreeMap<String, String> {
    form.fields
        .iter()
        .map(|(name, f)| (name.clone(), f.value.clone()))
        .collect()
}

/// Re-run every field's sync validators against the current value snapshot.
///
/// Replaces each field's `sync_errors` with the set of failing validator
/// names. Runs on every attach and every change; correctness, not
/// micro-optimization, governs this design.
///
/// # Errors
///
/// Returns [`StateError::UnknownValidator`] if any field's validation
/// string names a rule the registry cannot resolve. This is fatal by
/// contract; a misconfigured form must not silently pass as valid.
pub fn validate_form(mut form: Form, rules: &RuleRegistry) -> Result<Form, StateError> {
    let values = form_values(&form);

    for f in form.fields.values_mut() {
        let mut failing = BTreeSet::new();
        for validator in &f.sync_validators {
            if !rules.run(validator, &f.value, &values)? {
                failing.insert(validator.name.clone());
            }
        }
        f.sync_errors = failing;
    }

    Ok(form)
}

/// Apply one action to a form, producing the next form snapshot.
///
/// # Errors
///
/// Propagates [`StateError::UnknownValidator`] from the revalidation pass
/// on attach and change.
pub fn reduce(mut state: Form, action: &FormAction, rules: &RuleRegistry) -> Result<Form, StateError> {
    match action {
        FormAction::RegisterForm { id } => {
            state.id = id.clone();
            Ok(state)
        }

        FormAction::AttachToForm(payload) => {
            let attached = field::reduce(Field::default(), action);
            state.fields.insert(payload.name.clone(), attached);
            validate_form(state, rules)
        }

        FormAction::DetachFromForm { name, .. } => {
            state.fields.remove(name);
            Ok(state)
        }

        FormAction::Change { name, value, .. } => {
            // A fresh edit supersedes any server verdict on the whole form
            state.errors.clear();
            // Propagate staleness across every field first, so cross-field
            // dependents of `name` are marked before revalidation
            for f in state.fields.values_mut() {
                f.needs_validation = field_needs_validation(f, name, value);
            }
            let changed = state.fields.remove(name).unwrap_or_default();
            state.fields.insert(name.clone(), field::reduce(changed, action));
            validate_form(state, rules)
        }

        FormAction::Submit(_) => {
            state.submitting = true;
            state.fields = map_fields(state.fields, action);
            Ok(state)
        }

        FormAction::SubmitSuccessful { .. } => {
            state.submitting = false;
            state.fields = map_fields(state.fields, action);
            Ok(state)
        }

        FormAction::SubmitFailed { errors, .. } => {
            state.submitting = false;
            state.fields = map_fields(state.fields, action);
            state.errors = errors.form.iter().cloned().collect();
            Ok(state)
        }

        // Route to exactly the one named field
        FormAction::Blur { name, .. } => Ok(route_to(state, name, action)),
        FormAction::RequestAsyncValidation(payload) => Ok(route_to(state, &payload.name, action)),
        FormAction::NoAsyncErrors { name, .. } | FormAction::ReceiveAsyncErrors { name, .. } => {
            Ok(route_to(state, name, action))
        }

        // Broadcast; each field decides individually whether it applies
        FormAction::Touch { .. } | FormAction::ClearForm { .. } => {
            state.fields = map_fields(state.fields, action);
            Ok(state)
        }

        _ => Ok(state),
    }
}

fn route_to(mut state: Form, name: &str, action: &FormAction) -> Form {
    let f = state.fields.remove(name).unwrap_or_default();
    state.fields.insert(name.to_string(), field::reduce(f, action));
    state
}

fn map_fields(fields: HashMap<String, Field>, action: &FormAction) -> HashMap<String, Field> {
    fields
        .into_iter()
        .map(|(name, f)| (name, field::reduce(f, action)))
        .collect()
}
