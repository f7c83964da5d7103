//! Per-field validation messages for HTML forms.
//!
//! Invalid forms are not errors: handlers re-render the form with these
//! messages next to the offending inputs.

use std::collections::BTreeMap;

use serde::Serialize;

/// Key used for messages that do not belong to a single input.
pub const NON_FIELD: &str = "form";

/// Validation messages keyed by form field name.
///
/// Serialises as a plain map of `field -> [messages]` so templates can test
/// `errors.text` directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(message.into());
    }

    /// Record a message that applies to the whole form.
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD, message);
    }

    /// Single-message convenience constructor.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// `Ok(value)` when no messages were recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Result of submitting a create form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome<T> {
    /// The submission was valid and persisted.
    Saved(T),
    /// The submission failed validation; nothing was written.
    Invalid(FieldErrors),
}

/// Result of submitting an edit form.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome<T> {
    Saved(T),
    Invalid(FieldErrors),
    /// The editor does not own the resource; nothing was written.
    NotAuthor,
}
