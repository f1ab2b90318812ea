//! # Form Actions
//!
//! Defines all action types that flow through the action bus, plus the
//! topic classification used for subscription filtering.

use crate::payloads::{
    AttachPayload, ExternalAction, SubmitErrors, SubmitPayload, ValidationRequestPayload,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// All actions that can be published to the action bus.
///
/// Reducers consume every variant except [`FormAction::External`];
/// orchestrators consume `Submit`, `RequestAsyncValidation`, and the
/// `External` completion signals, and publish the terminal variants
/// (`SubmitSuccessful`, `SubmitFailed`, `NoAsyncErrors`,
/// `ReceiveAsyncErrors`) back into the stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FormAction {
    // =========================================================================
    // REGISTRY LIFECYCLE
    // =========================================================================
    /// Register a new form in the state tree.
    RegisterForm {
        /// Form id.
        id: String,
    },

    /// Remove a form from the state tree.
    UnregisterForm {
        /// Form id.
        id: String,
    },

    /// A field attached to a form (UI element mounted).
    AttachToForm(AttachPayload),

    /// A field detached from a form (UI element unmounted).
    ///
    /// A detach addressed at a form that has already been unregistered is
    /// a no-op; unmount ordering in the surrounding UI layer makes this a
    /// legal sequence, and it must not recreate the form.
    DetachFromForm {
        /// Form id.
        id: String,
        /// Field name.
        name: String,
    },

    // =========================================================================
    // FIELD EDITS
    // =========================================================================
    /// A field's value changed.
    Change {
        /// Form id.
        id: String,
        /// Field name.
        name: String,
        /// The new value.
        value: String,
    },

    /// A field lost focus.
    Blur {
        /// Form id.
        id: String,
        /// Field name.
        name: String,
    },

    /// Mark fields as touched.
    ///
    /// `fields: None` touches every field of the form.
    Touch {
        /// Form id.
        id: String,
        /// Specific fields to touch; all fields when absent.
        fields: Option<Vec<String>>,
    },

    /// Reset field values and all error state.
    ///
    /// `fields: None` clears every field of the form.
    ClearForm {
        /// Form id.
        id: String,
        /// Specific fields to clear; all fields when absent.
        fields: Option<Vec<String>>,
    },

    // =========================================================================
    // SUBMISSION (orchestrated)
    // =========================================================================
    /// Request a form submission. Consumed by the submission orchestrator,
    /// which dispatches the carried external action and races its
    /// completion signals. Every submit spawns an independent workflow;
    /// later submits never cancel earlier ones.
    Submit(SubmitPayload),

    /// A submission settled successfully. Terminal state action published
    /// by the submission orchestrator.
    SubmitSuccessful {
        /// Form id.
        id: String,
        /// Payload of the success completion, passed through to callers.
        data: Value,
    },

    /// A submission settled with failure. Terminal state action published
    /// by the submission orchestrator.
    SubmitFailed {
        /// Form id.
        id: String,
        /// Server-reported errors, keyed by field name.
        errors: SubmitErrors,
    },

    // =========================================================================
    // ASYNC VALIDATION (orchestrated)
    // =========================================================================
    /// Request an asynchronous validation for one `(form, field, validator)`
    /// key. Consumed by the validation orchestrator. Latest wins per key:
    /// a newer request for the same key abandons the older wait.
    RequestAsyncValidation(ValidationRequestPayload),

    /// An async validation settled clean.
    NoAsyncErrors {
        /// Form id.
        id: String,
        /// Field name.
        name: String,
        /// Validator name.
        validator: String,
    },

    /// An async validation settled with an error.
    ReceiveAsyncErrors {
        /// Form id.
        id: String,
        /// Field name.
        name: String,
        /// Validator name.
        validator: String,
    },

    // =========================================================================
    // EXTERNAL EFFECTS AND COMPLETION SIGNALS
    // =========================================================================
    /// A caller-supplied action dispatched verbatim by an orchestrator, or
    /// a completion signal published by the caller's transport layer.
    /// Opaque to the reducers.
    External(ExternalAction),
}

impl FormAction {
    /// Get the topic for this action (for filtering).
    #[must_use]
    pub fn topic(&self) -> ActionTopic {
        match self {
            Self::RegisterForm { .. }
            | Self::UnregisterForm { .. }
            | Self::AttachToForm(_)
            | Self::DetachFromForm { .. } => ActionTopic::Registry,
            Self::Change { .. }
            | Self::Blur { .. }
            | Self::Touch { .. }
            | Self::ClearForm { .. } => ActionTopic::FieldEdit,
            Self::Submit(_) | Self::SubmitSuccessful { .. } | Self::SubmitFailed { .. } => {
                ActionTopic::Submission
            }
            Self::RequestAsyncValidation(_)
            | Self::NoAsyncErrors { .. }
            | Self::ReceiveAsyncErrors { .. } => ActionTopic::Validation,
            Self::External(_) => ActionTopic::External,
        }
    }

    /// Get the form id this action addresses, if any.
    #[must_use]
    pub fn form_id(&self) -> Option<&str> {
        match self {
            Self::RegisterForm { id }
            | Self::UnregisterForm { id }
            | Self::DetachFromForm { id, .. }
            | Self::Change { id, .. }
            | Self::Blur { id, .. }
            | Self::Touch { id, .. }
            | Self::ClearForm { id, .. }
            | Self::SubmitSuccessful { id, .. }
            | Self::SubmitFailed { id, .. }
            | Self::NoAsyncErrors { id, .. }
            | Self::ReceiveAsyncErrors { id, .. } => Some(id),
            Self::AttachToForm(payload) => Some(&payload.id),
            Self::Submit(payload) => Some(&payload.id),
            Self::RequestAsyncValidation(payload) => Some(&payload.id),
            Self::External(_) => None,
        }
    }

    /// Convenience constructor: touch a single field.
    #[must_use]
    pub fn touch_field(id: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Touch {
            id: id.into(),
            fields: Some(vec![field.into()]),
        }
    }

    /// Convenience constructor: a value change.
    #[must_use]
    pub fn change(
        id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Change {
            id: id.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Action topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTopic {
    /// Form/field lifecycle: register, unregister, attach, detach.
    Registry,
    /// Value edits and touch state: change, blur, touch, clear.
    FieldEdit,
    /// Submission request and terminal actions.
    Submission,
    /// Async validation request and terminal actions.
    Validation,
    /// Caller-supplied effects and completion signals.
    External,
    /// All actions (no filtering).
    All,
}

/// Filter for subscribing to specific actions.
#[derive(Debug, Clone, Default)]
pub struct ActionFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<ActionTopic>,
    /// External action types to include. Empty means all actions;
    /// non-empty restricts the filter to `External` actions whose
    /// `action_type` is listed (the completion-wait case).
    pub action_types: Vec<String>,
}

impl ActionFilter {
    /// Create a filter that accepts all actions.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<ActionTopic>) -> Self {
        Self {
            topics,
            action_types: Vec::new(),
        }
    }

    /// Create a filter that accepts only the named completion signals.
    #[must_use]
    pub fn completions(action_types: Vec<String>) -> Self {
        Self {
            topics: Vec::new(),
            action_types,
        }
    }

    /// Check if an action matches this filter.
    #[must_use]
    pub fn matches(&self, action: &FormAction) -> bool {
        if !self.action_types.is_empty() {
            return match action {
                FormAction::External(ext) => self.action_types.contains(&ext.action_type),
                _ => false,
            };
        }

        self.topics.is_empty()
            || self.topics.contains(&ActionTopic::All)
            || self.topics.contains(&action.topic())
    }
}
