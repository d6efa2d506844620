//! Request body validation.
//!
//! Request payloads arrive as loosely typed JSON so that every field can be
//! reported on individually (missing, wrong type, too long) instead of failing
//! on the first serde error. The rules here are pure functions over a JSON
//! object and collect their findings into [`ValidationErrors`].

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for a single field.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// Returns `value` when nothing was recorded, `self` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// Summary line: the first message plus a count of the remaining ones.
    pub fn summary(&self) -> String {
        let mut messages = self.fields.values().flatten();
        let Some(first) = messages.next() else {
            return "The given data was invalid.".to_string();
        };

        match messages.count() {
            0 => first.clone(),
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

/// Whether a field must be present in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absent, null and blank values are rejected.
    Required,
    /// Absent is fine; if present it must satisfy the remaining rules.
    Sometimes,
}

/// Views a request body as a JSON object. Anything else reads as empty.
pub fn body_object(body: &Value) -> Map<String, Value> {
    body.as_object().cloned().unwrap_or_default()
}

/// Reads a string field, recording presence and type violations.
///
/// Returns `None` when the field is absent or invalid.
pub fn read_string(
    body: &Map<String, Value>,
    field: &str,
    presence: Presence,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let label = field_label(field);

    match (body.get(field), presence) {
        (None, Presence::Sometimes) => None,
        (None, Presence::Required) | (Some(Value::Null), Presence::Required) => {
            errors.add(field, format!("The {label} field is required."));
            None
        }
        (Some(Value::String(s)), presence) if s.trim().is_empty() => {
            match presence {
                Presence::Required => errors.add(field, format!("The {label} field is required.")),
                Presence::Sometimes => {
                    errors.add(field, format!("The {label} field must not be empty."))
                }
            }
            None
        }
        (Some(Value::String(s)), _) => Some(s.clone()),
        (Some(_), _) => {
            errors.add(field, format!("The {label} field must be a string."));
            None
        }
    }
}

/// Rejects values longer than `max` characters (not bytes).
pub fn check_max_chars(field: &str, value: &str, max: usize, errors: &mut ValidationErrors) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {max} characters.",
                field_label(field)
            ),
        );
    }
}

/// Rejects values shorter than `min` characters.
pub fn check_min_chars(field: &str, value: &str, min: usize, errors: &mut ValidationErrors) {
    if value.chars().count() < min {
        errors.add(
            field,
            format!(
                "The {} field must be at least {min} characters.",
                field_label(field)
            ),
        );
    }
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain, no whitespace.
pub fn check_email(field: &str, value: &str, errors: &mut ValidationErrors) {
    if !is_plausible_email(value) {
        errors.add(
            field,
            format!(
                "The {} field must be a valid email address.",
                field_label(field)
            ),
        );
    }
}

fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn field_label(field: &str) -> String {
    field.replace('_', " ")
}
