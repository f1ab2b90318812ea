//! # Sync Validation Rules
//!
//! A startup-resolved registry of named pure rule functions. Rules receive
//! the field's value, the parsed positional parameters, and a snapshot of
//! every field value in the form, so a rule can reference sibling fields
//! by name (`matches:password`).
//!
//! Lookup failure is a configuration error: it means a validation string
//! names a rule nobody registered, which is a developer mistake rather
//! than bad user input.

use crate::error::StateError;
use crate::validators::SyncValidator;
use std::collections::{BTreeMap, HashMap};

/// A pure synchronous rule: `(value, params, form_values) -> passes`.
pub type RuleFn = fn(&str, &[Option<String>], &BTreeMap<String, String>) -> bool;

/// Registry of named validation rules, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, RuleFn>,
}

impl RuleRegistry {
    /// Create a registry preloaded with the builtin rules.
    #[must_use]
    pub fn builtin() -> Self {
        let mut rules: HashMap<String, RuleFn> = HashMap::new();
        rules.insert("required".to_string(), required);
        rules.insert("length".to_string(), length);
        rules.insert("min".to_string(), min);
        rules.insert("max".to_string(), max);
        rules.insert("numeric".to_string(), numeric);
        rules.insert("email".to_string(), email);
        rules.insert("matches".to_string(), matches);
        Self { rules }
    }

    /// Create an empty registry (custom-rules-only setups).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Builder method to register a custom rule under a canonical name.
    #[must_use]
    pub fn with_rule(mut self, name: impl Into<String>, rule: RuleFn) -> Self {
        self.rules.insert(name.into(), rule);
        self
    }

    /// Resolve a rule by canonical name.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownValidator`] when no rule carries the
    /// name. Callers must treat this as fatal.
    pub fn resolve(&self, name: &str) -> Result<RuleFn, StateError> {
        self.rules
            .get(name)
            .copied()
            .ok_or_else(|| StateError::UnknownValidator {
                name: name.to_string(),
            })
    }

    /// Run one parsed validator against a value and the form snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownValidator`] when the validator's name
    /// does not resolve.
    pub fn run(
        &self,
        validator: &SyncValidator,
        value: &str,
        form_values: &BTreeMap<String, String>,
    ) -> Result<bool, StateError> {
        let rule = self.resolve(&validator.name)?;
        Ok(rule(value, &validator.params, form_values))
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// BUILTIN RULES
// =============================================================================
// Every rule except `required` passes on an empty value; emptiness is
// `required`'s concern and stacking both rules must not double-report.

fn required(value: &str, _params: &[Option<String>], _values: &BTreeMap<String, String>) -> bool {
    !value.trim().is_empty()
}

/// `length:min,max`. Either bound may be absent (`length:,6`).
fn length(value: &str, params: &[Option<String>], _values: &BTreeMap<String, String>) -> bool {
    if value.is_empty() {
        return true;
    }
    let chars = value.chars().count();
    let min_ok = param_usize(params, 0).is_none_or(|min| chars >= min);
    let max_ok = param_usize(params, 1).is_none_or(|max| chars <= max);
    min_ok && max_ok
}

/// `min:n`, a numeric lower bound.
fn min(value: &str, params: &[Option<String>], _values: &BTreeMap<String, String>) -> bool {
    if value.is_empty() {
        return true;
    }
    match (value.parse::<f64>(), param_f64(params, 0)) {
        (Ok(v), Some(bound)) => v >= bound,
        (Err(_), Some(_)) => false,
        (_, None) => true,
    }
}

/// `max:n`, a numeric upper bound.
fn max(value: &str, params: &[Option<String>], _values: &BTreeMap<String, String>) -> bool {
    if value.is_empty() {
        return true;
    }
    match (value.parse::<f64>(), param_f64(params, 0)) {
        (Ok(v), Some(bound)) => v <= bound,
        (Err(_), Some(_)) => false,
        (_, None) => true,
    }
}

fn numeric(value: &str, _params: &[Option<String>], _values: &BTreeMap<String, String>) -> bool {
    value.is_empty() || value.parse::<f64>().is_ok()
}

/// Deliberately loose shape check; real deliverability is an async concern.
fn email(value: &str, _params: &[Option<String>], _values: &BTreeMap<String, String>) -> bool {
    if value.is_empty() {
        return true;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// `matches:other`, cross-field equality against the named sibling.
fn matches(value: &str, params: &[Option<String>], values: &BTreeMap<String, String>) -> bool {
    let Some(Some(other)) = params.first() else {
        return true;
    };
    values.get(other).map(String::as_str).unwrap_or("") == value
}

fn param_usize(params: &[Option<String>], idx: usize) -> Option<usize> {
    params.get(idx)?.as_ref()?.parse().ok()
}

fn param_f64(params: &[Option<String>], idx: usize) -> Option<f64> {
    params.get(idx)?.as_ref()?.parse().ok()
}
