//! Per-field validation errors surfaced by form submissions.
//!
//! Submissions that fail validation are not faults: handlers re-render the
//! form with these messages next to the offending inputs.

use std::collections::BTreeMap;

use serde::Serialize;

/// Message shown when a required text field is missing or blank.
pub const REQUIRED_MESSAGE: &str = "Please fill in this field.";
/// Message shown when a choice field names an unknown option.
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
/// Message shown when an uploaded file is not an image.
pub const INVALID_IMAGE_MESSAGE: &str = "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
/// Key for errors that belong to the form as a whole.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// An empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an error set holding a single message.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Whether no messages were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded against `field`.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `field` carries any message.
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }
}

/// Result of a write use case driven by a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<T> {
    /// The submission was valid and has been persisted.
    Accepted(T),
    /// The submission failed validation; nothing was written.
    Rejected(FieldErrors),
}
