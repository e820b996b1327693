//! Item traits defining the core abstraction for every listed record

use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque backend identifier
///
/// The backend hands out string ids (document ids, not UUIDs), so they are
/// kept verbatim and only compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Base trait for every record shown in a list view.
///
/// A list item provides:
/// - a stable identifier
/// - the text fields searched by the free-text filter
/// - dynamic field access used by enum filters, relation filters and sorting
pub trait ListItem: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs and logs (e.g., "tasks")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "task")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this item
    fn id(&self) -> &RecordId;

    /// Fields matched by the search box
    fn search_fields() -> &'static [&'static str];

    /// Fields the table allows sorting on
    fn sortable_fields() -> &'static [&'static str];

    /// Get the value of a specific field by name
    ///
    /// Returns `None` for fields the item does not have, which never match a
    /// filter and sort as `Null`.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Headline text for the item (title or name)
    fn label(&self) -> String {
        Self::search_fields()
            .first()
            .and_then(|field| self.field_value(field))
            .map(|value| value.display())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct TestItem {
        id: RecordId,
        name: String,
    }

    impl ListItem for TestItem {
        fn resource_name() -> &'static str {
            "test_items"
        }

        fn resource_name_singular() -> &'static str {
            "test_item"
        }

        fn id(&self) -> &RecordId {
            &self.id
        }

        fn search_fields() -> &'static [&'static str] {
            &["name"]
        }

        fn sortable_fields() -> &'static [&'static str] {
            &["name"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(FieldValue::text(&self.name)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_label_uses_first_search_field() {
        let item = TestItem {
            id: RecordId::new("1"),
            name: "Launch".to_string(),
        };
        assert_eq!(item.label(), "Launch");
        assert_eq!(TestItem::resource_name(), "test_items");
    }

    #[test]
    fn test_record_id_is_transparent() {
        let id: RecordId = serde_json::from_str("\"65f1c0\"").unwrap();
        assert_eq!(id.as_str(), "65f1c0");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"65f1c0\"");
    }
}
