//! Field values exposed by list items for filtering and sorting

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// A polymorphic field value read from a list item
///
/// Each variant carries its own comparison rule: text compares
/// case-insensitively, dates by instant, numbers numerically and enum
/// variants by their declaration ordinal.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    /// A closed enum value: its declaration ordinal, wire key and the
    /// legacy aliases that name the same variant
    Variant {
        ordinal: u8,
        key: &'static str,
        aliases: &'static [&'static str],
    },
    Null,
}

impl FieldValue {
    /// Convenience constructor for text fields
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Map an optional value, using `Null` for `None`
    pub fn optional<T>(value: Option<T>, f: impl FnOnce(T) -> FieldValue) -> Self {
        value.map(f).unwrap_or(FieldValue::Null)
    }

    /// Get the value as a string if possible
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Case-insensitive substring test, only meaningful for text
    ///
    /// `needle` must already be lowercase.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            FieldValue::Text(s) => s.to_lowercase().contains(needle),
            _ => false,
        }
    }

    /// Equality against a filter key as typed by the user or a select box
    ///
    /// Variants match on their wire key or any alias, text matches exactly,
    /// other scalars match their display form.
    pub fn matches_key(&self, key: &str) -> bool {
        match self {
            FieldValue::Variant { key: own, aliases, .. } => {
                let key = key.trim();
                own.eq_ignore_ascii_case(key) || aliases.iter().any(|a| a.eq_ignore_ascii_case(key))
            }
            FieldValue::Text(s) => s == key,
            FieldValue::Integer(i) => i.to_string() == key,
            FieldValue::Boolean(b) => b.to_string() == key,
            FieldValue::Float(_) | FieldValue::DateTime(_) | FieldValue::Null => false,
        }
    }

    /// Total order used by the sort engine
    ///
    /// Values of different kinds order by kind rank, with `Null` first.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.total_cmp(b),
            (FieldValue::Integer(a), FieldValue::Float(b)) => (*a as f64).total_cmp(b),
            (FieldValue::Float(a), FieldValue::Integer(b)) => a.total_cmp(&(*b as f64)),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            (FieldValue::Variant { ordinal: a, .. }, FieldValue::Variant { ordinal: b, .. }) => {
                a.cmp(b)
            }
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Float(_) => 2,
            FieldValue::Variant { .. } => 3,
            FieldValue::DateTime(_) => 4,
            FieldValue::Text(_) => 5,
        }
    }

    /// Human-readable rendering used by table cells
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => format!("{:.2}", f),
            FieldValue::Boolean(true) => "yes".to_string(),
            FieldValue::Boolean(false) => "no".to_string(),
            FieldValue::DateTime(dt) => dt.format("%Y-%m-%d").to_string(),
            FieldValue::Variant { key, .. } => key.to_string(),
            FieldValue::Null => "-".to_string(),
        }
    }
}
