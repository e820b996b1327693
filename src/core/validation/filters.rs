//! Field filters
//!
//! These transform form values before validation.

/// Trim surrounding whitespace in place
pub fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trim and lowercase, for emails and other case-insensitive keys
pub fn lowercase(value: &mut String) {
    trim(value);
    if value.chars().any(char::is_uppercase) {
        *value = value.to_lowercase();
    }
}

/// Collapse runs of whitespace into single spaces
pub fn collapse_whitespace(value: &mut String) {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed != *value {
        *value = collapsed;
    }
}

/// Trim an optional value, turning blank into `None`
pub fn trim_optional(value: &mut Option<String>) {
    if let Some(inner) = value {
        trim(inner);
        if inner.is_empty() {
            *value = None;
        }
    }
}

/// Forms that clean their own input before validation
pub trait Normalize {
    fn normalize(&mut self);
}
