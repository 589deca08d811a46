use std::collections::BTreeMap;

use serde::Serialize;

/// Per-field validation messages shown next to a redisplayed form.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Confirmation view rendered when a delete targets a row that is already gone.
#[derive(Debug, Default, Serialize, utoipa::ToSchema)]
pub struct EmptyView {}

/// Maximum length of a display name, in Unicode characters.
pub const MAX_NAME_LEN: usize = 256;

/// Validate a display name (required, 1-256 characters after trimming).
pub fn validate_name(errors: &mut FieldErrors, field: &str, label: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, format!("{label} is required"));
    } else if value.chars().count() > MAX_NAME_LEN {
        errors.add(
            field,
            format!("{label} must be at most {MAX_NAME_LEN} characters"),
        );
    }
}

/// Parse an optional integer form field, recording a message when it is present
/// but not a number.
pub fn parse_id_field(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    raw: Option<&str>,
) -> Option<i32> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    match raw {
        None => {
            errors.add(field, format!("{label} is required"));
            None
        }
        Some(s) => match s.parse::<i32>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add(field, format!("The value '{s}' is not valid for {label}"));
                None
            }
        },
    }
}
