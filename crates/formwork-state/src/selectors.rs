//! # Derived Views
//!
//! Pure read projections over the state tree, consumed by presentation
//! layers outside this workspace. Selectors never mutate and never fail:
//! missing forms and fields read as empty defaults.

use crate::field::Field;
use crate::form::Form;
use crate::forms::FormsState;
use std::collections::{BTreeMap, BTreeSet};

/// Look up a form by id.
#[must_use]
pub fn get_form<'a>(state: &'a FormsState, id: &str) -> Option<&'a Form> {
    state.forms.get(id)
}

/// Look up a field within a form.
#[must_use]
pub fn get_field<'a>(state: &'a FormsState, id: &str, name: &str) -> Option<&'a Field> {
    get_form(state, id).and_then(|form| form.fields.get(name))
}

/// Whether a submission workflow is in flight for the form.
#[must_use]
pub fn form_is_submitting(state: &FormsState, id: &str) -> bool {
    get_form(state, id).is_some_and(|form| form.submitting)
}

/// Snapshot of every field value, keyed by field name.
#[must_use]
pub fn form_values(state: &FormsState, id: &str) -> BTreeMap<String, String> {
    get_form(state, id).map(crate::form::form_values).unwrap_or_default()
}

/// Names of every attached field.
#[must_use]
pub fn form_field_names(state: &FormsState, id: &str) -> Vec<String> {
    let mut names: Vec<String> = get_form(state, id)
        .map(|form| form.fields.keys().cloned().collect())
        .unwrap_or_default();
    names.sort();
    names
}

/// Touch state per field.
#[must_use]
pub fn form_touched_fields(state: &FormsState, id: &str) -> BTreeMap<String, bool> {
    get_form(state, id)
        .map(|form| {
            form.fields
                .iter()
                .map(|(name, f)| (name.clone(), f.touched))
                .collect()
        })
        .unwrap_or_default()
}

/// Per-field union of sync and async error names.
///
/// Server errors are deliberately excluded: they describe the last
/// submission attempt, not the current input's validity.
#[must_use]
pub fn form_errors(state: &FormsState, id: &str) -> BTreeMap<String, BTreeSet<String>> {
    get_form(state, id)
        .map(|form| {
            form.fields
                .iter()
                .map(|(name, f)| {
                    (
                        name.clone(),
                        f.sync_errors.union(&f.async_errors).cloned().collect(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Form-level errors of server origin.
#[must_use]
pub fn form_level_errors(state: &FormsState, id: &str) -> BTreeSet<String> {
    get_form(state, id).map(|form| form.errors.clone()).unwrap_or_default()
}

/// Whether every field's sync∪async error union is empty.
#[must_use]
pub fn form_is_valid(state: &FormsState, id: &str) -> bool {
    form_errors(state, id).values().all(BTreeSet::is_empty)
}

/// A field's current value; empty when the field is absent.
#[must_use]
pub fn field_value(state: &FormsState, id: &str, name: &str) -> String {
    get_field(state, id, name).map(|f| f.value.clone()).unwrap_or_default()
}

/// Whether a field has been touched.
#[must_use]
pub fn field_touched(state: &FormsState, id: &str, name: &str) -> bool {
    get_field(state, id, name).is_some_and(|f| f.touched)
}

/// Whether a field's sync validity may be stale.
#[must_use]
pub fn field_needs_validation(state: &FormsState, id: &str, name: &str) -> bool {
    get_field(state, id, name).is_some_and(|f| f.needs_validation)
}

/// A field's current sync error names.
#[must_use]
pub fn field_sync_errors(state: &FormsState, id: &str, name: &str) -> BTreeSet<String> {
    get_field(state, id, name).map(|f| f.sync_errors.clone()).unwrap_or_default()
}

/// A field's current async error names.
#[must_use]
pub fn field_async_errors(state: &FormsState, id: &str, name: &str) -> BTreeSet<String> {
    get_field(state, id, name).map(|f| f.async_errors.clone()).unwrap_or_default()
}

/// A field's current server error names.
#[must_use]
pub fn field_server_errors(state: &FormsState, id: &str, name: &str) -> BTreeSet<String> {
    get_field(state, id, name).map(|f| f.server_errors.clone()).unwrap_or_default()
}

/// Whether the named async validator is currently in flight.
#[must_use]
pub fn field_is_validating(state: &FormsState, id: &str, name: &str, validator: &str) -> bool {
    get_field(state, id, name).is_some_and(|f| {
        f.async_validators
            .iter()
            .any(|v| v.name == validator && v.is_validating)
    })
}
