//! # Validator Records and Parsing
//!
//! Converts the compact validation-rule grammar into normalized validator
//! records. Parsing is pure and total: malformed input never fails here,
//! unrecognized validator names are caught later at validation time.
//!
//! Grammar: `rule ('|' rule)*` where `rule := name (':' param (',' param)*)?`.
//! Empty segments are ignored; empty positional parameters are explicit
//! "absent" placeholders (`validate:,3` omits the first parameter).

use serde::{Deserialize, Serialize};

/// One parsed synchronous validation rule with its positional arguments.
///
/// Immutable once parsed. `params` entries are `None` where the source
/// text held an empty placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncValidator {
    /// Canonical (camelCase) rule name.
    pub name: String,
    /// Positional arguments, in source order.
    pub params: Vec<Option<String>>,
}

impl SyncValidator {
    /// Create a validator record with no parameters.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }
}

/// One named asynchronous check and its in-flight flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncValidator {
    /// Validator name, matched against completion actions.
    pub name: String,
    /// Whether a request is currently in flight for this validator.
    pub is_validating: bool,
}

impl AsyncValidator {
    /// Create an idle async-validator record.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_validating: false,
        }
    }
}

/// Parse a `|`-delimited validation string into validator records.
///
/// Duplicate segments (by exact text) are dropped, first occurrence wins
/// the position. Never fails.
#[must_use]
pub fn parse_sync_validators(validation: &str) -> Vec<SyncValidator> {
    let mut seen: Vec<&str> = Vec::new();
    for segment in validation.split('|') {
        if !segment.is_empty() && !seen.contains(&segment) {
            seen.push(segment);
        }
    }

    seen.into_iter().map(parse_segment).collect()
}

/// Parse one async-validator record per supplied name, not yet validating.
#[must_use]
pub fn parse_async_validators(names: &[String]) -> Vec<AsyncValidator> {
    names.iter().map(AsyncValidator::named).collect()
}

fn parse_segment(segment: &str) -> SyncValidator {
    let mut name = segment;
    let mut params: Vec<&str> = Vec::new();

    // Parameters are separated from the rule name with a colon. A colon in
    // first position belongs to the name, odd as that is; the original
    // grammar only splits past position zero.
    if let Some(idx) = segment.find(':').filter(|&idx| idx > 0) {
        name = &segment[..idx];
        let raw = &segment[idx + 1..];

        // Multiple parameters may be delimited by a comma
        if raw.contains(',') {
            params = raw.split(',').collect();
        } else {
            params = vec![raw];
        }
    }

    SyncValidator {
        name: camel_case(name),
        // Empty strings become explicit absent placeholders, to support
        // the `validate:,3` form where the first parameter is omitted
        params: params
            .into_iter()
            .map(|p| (!p.is_empty()).then(|| p.to_string()))
            .collect(),
    }
}

/// Normalize a delimited rule name to camelCase.
///
/// Names already in identifier form pass through unchanged; dash, underscore
/// and space delimited names are folded (`min-length` -> `minLength`).
#[must_use]
pub fn camel_case(name: &str) -> String {
    if !name.contains(['-', '_', ' ']) {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len());
    for (i, segment) in name
        .split(['-', '_', ' '])
        .filter(|s| !s.is_empty())
        .enumerate()
    {
        let lower = segment.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}
