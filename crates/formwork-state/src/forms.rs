//! # Forms Registry Reducer
//!
//! Maps form ids to form entities. Registration and unregistration are
//! handled here; every other addressed action is routed to the owning
//! form, which is lazily created with defaults when absent. The one
//! exception is detach: a detach for an unregistered form is a no-op,
//! because UI teardown may deliver the detach after the unregister.

use crate::error::StateError;
use crate::form::{self, Form};
use crate::rules::RuleRegistry;
use formwork_actions::FormAction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// The whole state tree: every registered form, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormsState {
    /// Registered forms. A form exists here iff it has been registered
    /// and not yet unregistered.
    pub forms: HashMap<String, Form>,
}

/// Apply one action to the registry, producing the next state snapshot.
///
/// # Errors
///
/// Propagates [`StateError::UnknownValidator`] from the addressed form's
/// revalidation pass.
pub fn reduce(
    mut state: FormsState,
    action: &FormAction,
    rules: &RuleRegistry,
) -> Result<FormsState, StateError> {
    match action {
        FormAction::RegisterForm { id } => {
            trace!(form = %id, "Form registered");
            let form = form::reduce(Form::default(), action, rules)?;
            state.forms.insert(id.clone(), form);
            Ok(state)
        }

        FormAction::UnregisterForm { id } => {
            trace!(form = %id, "Form unregistered");
            state.forms.remove(id);
            Ok(state)
        }

        // Teardown-ordering exception: never recreate the form
        FormAction::DetachFromForm { id, .. } if !state.forms.contains_key(id) => Ok(state),

        // Opaque caller traffic; reducers never inspect it
        FormAction::External(_) => Ok(state),

        _ => {
            let Some(id) = action.form_id() else {
                return Ok(state);
            };
            let mut form = state.forms.remove(id).unwrap_or_default();
            if form.id.is_empty() {
                form.id = id.to_string();
            }
            let form = form::reduce(form, action, rules)?;
            state.forms.insert(id.to_string(), form);
            Ok(state)
        }
    }
}
