//! Collects per-field error messages for submitted forms.

use std::collections::BTreeMap;

/// Accumulates at most one error message per form field.
///
/// The first failed check for a field wins, later failures for the same
/// field are ignored so that the most basic problem is shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validator {
    errors: BTreeMap<&'static str, String>,
}

impl Validator {
    /// Create a validator with no errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` under `field` if `is_ok` is false.
    pub fn check(&mut self, is_ok: bool, field: &'static str, message: &str) {
        if !is_ok {
            self.add_error(field, message);
        }
    }

    /// Record `message` under `field` unless `field` already has an error.
    pub fn add_error(&mut self, field: &'static str, message: &str) {
        self.errors
            .entry(field)
            .or_insert_with(|| message.to_owned());
    }

    /// Whether every check so far has passed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All recorded errors keyed by field name.
    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    /// The error message for `field`, if any.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

/// Whether `value` contains anything other than whitespace.
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Whether `value` has no more than `max` characters.
///
/// Characters are counted as Unicode scalar values, not bytes.
pub fn max_chars(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

/// Whether `value` has at least `min` characters.
pub fn min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}
