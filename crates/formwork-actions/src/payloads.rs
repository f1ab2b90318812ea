//! # Action Payloads
//!
//! Structured payloads carried by the richer [`crate::FormAction`] variants.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An opaque caller-supplied action.
///
/// The engine dispatches these verbatim and never inspects the payload;
/// the caller's transport layer is expected to recognize the `action_type`,
/// perform the side effect, and answer by publishing another
/// `ExternalAction` whose type matches one of the completion types named in
/// the request's [`CompletionRoute`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalAction {
    /// Name of the action, used for completion-signal matching.
    pub action_type: String,
    /// Arbitrary payload, opaque to the engine.
    pub payload: Value,
}

impl ExternalAction {
    /// Create an external action with a null payload.
    #[must_use]
    pub fn named(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: Value::Null,
        }
    }

    /// Create an external action with a payload.
    #[must_use]
    pub fn with_payload(action_type: impl Into<String>, payload: Value) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }
}

/// The pair of completion-signal names an orchestrator races on.
///
/// The first external action whose `action_type` equals one of these two
/// names settles the corresponding request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRoute {
    /// Action type that signals success.
    pub success_action_type: String,
    /// Action type that signals failure.
    pub failure_action_type: String,
}

impl CompletionRoute {
    /// Create a completion route from a success/failure action-type pair.
    #[must_use]
    pub fn new(success: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            success_action_type: success.into(),
            failure_action_type: failure.into(),
        }
    }
}

/// A caller callback invoked after a submission settles.
///
/// Lives outside the state tree: it lets the initiating caller chain
/// further behavior (navigation, notifications) off the terminal state.
/// Cheap to clone; the closure is shared, not copied.
#[derive(Clone)]
pub struct SubmitCallback(Arc<dyn Fn(&Value) + Send + Sync>);

impl SubmitCallback {
    /// Wrap a closure as a submit callback.
    pub fn new(f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the callback with the settled payload.
    pub fn invoke(&self, payload: &Value) {
        (self.0)(payload);
    }
}

impl fmt::Debug for SubmitCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SubmitCallback(..)")
    }
}

/// Payload for [`crate::FormAction::AttachToForm`].
///
/// Everything except `id` and `name` is optional so that re-attaching
/// without validator inputs leaves previously parsed validators untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttachPayload {
    /// Target form id.
    pub id: String,
    /// Field name within the form.
    pub name: String,
    /// Initial value; ignored when empty.
    #[serde(default)]
    pub initial_value: Option<String>,
    /// Compact validation-rule string, e.g. `"required|length:1,6"`.
    #[serde(default)]
    pub validation: Option<String>,
    /// Names of asynchronous validators attached to this field.
    #[serde(default)]
    pub async_validators: Option<Vec<String>>,
}

/// Payload for [`crate::FormAction::Submit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPayload {
    /// Target form id.
    pub id: String,
    /// The caller-supplied submit effect, dispatched verbatim.
    pub action: ExternalAction,
    /// Completion routing plus optional caller callbacks.
    pub meta: SubmitMeta,
}

/// Meta for a submit request: completion routing plus caller callbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitMeta {
    /// Completion-signal pair the submission workflow races on.
    #[serde(flatten)]
    pub route: CompletionRoute,
    /// Invoked with the success payload after `SubmitSuccessful` is
    /// dispatched. Not serialized; lost across any wire boundary.
    #[serde(skip)]
    pub on_submit_success: Option<SubmitCallback>,
    /// Invoked with the failure payload after `SubmitFailed` is dispatched.
    #[serde(skip)]
    pub on_submit_failure: Option<SubmitCallback>,
}

impl SubmitMeta {
    /// Create a submit meta with no callbacks.
    #[must_use]
    pub fn routed(route: CompletionRoute) -> Self {
        Self {
            route,
            on_submit_success: None,
            on_submit_failure: None,
        }
    }

    /// Builder method to set the success callback.
    #[must_use]
    pub fn on_success(mut self, cb: SubmitCallback) -> Self {
        self.on_submit_success = Some(cb);
        self
    }

    /// Builder method to set the failure callback.
    #[must_use]
    pub fn on_failure(mut self, cb: SubmitCallback) -> Self {
        self.on_submit_failure = Some(cb);
        self
    }
}

/// Payload for [`crate::FormAction::RequestAsyncValidation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequestPayload {
    /// Target form id.
    pub id: String,
    /// Field name within the form.
    pub name: String,
    /// Name of the async validator this request belongs to.
    pub validator: String,
    /// The caller-supplied validation effect, dispatched verbatim.
    pub action: ExternalAction,
    /// Completion-signal pair the validation workflow races on.
    pub meta: CompletionRoute,
}

/// Server-reported errors carried by [`crate::FormAction::SubmitFailed`].
///
/// Keyed by field name, with the reserved `form` key carrying form-scoped
/// errors. Error entries are validator/error names, not display messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitErrors {
    /// Form-level errors (not attributable to a single field).
    #[serde(default)]
    pub form: Vec<String>,
    /// Per-field error names.
    #[serde(flatten)]
    pub fields: HashMap<String, Vec<String>>,
}

impl SubmitErrors {
    /// Error names reported for a field; empty when the field has no entry.
    #[must_use]
    pub fn for_field(&self, name: &str) -> &[String] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    /// Builder method to add errors for one field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, errors: Vec<String>) -> Self {
        self.fields.insert(name.into(), errors);
        self
    }

    /// Builder method to set form-level errors.
    #[must_use]
    pub fn with_form_errors(mut self, errors: Vec<String>) -> Self {
        self.form = errors;
        self
    }

    /// Extract errors from a failure completion's error envelope.
    ///
    /// The failure payload is expected to carry `{ "error": { "errors":
    /// { ... } } }`; anything missing or malformed yields an empty set
    /// rather than an error, since the envelope shape is owned by the
    /// external transport.
    #[must_use]
    pub fn from_envelope(payload: &Value) -> Self {
        payload
            .get("error")
            .and_then(|e| e.get("errors"))
            .and_then(|errors| serde_json::from_value(errors.clone()).ok())
            .unwrap_or_default()
    }
}
