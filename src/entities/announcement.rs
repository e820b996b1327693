//! Company announcements

use super::Relation;
use crate::core::badge::{AnnouncementCategory, ClosedEnum};
use crate::core::editor::plain_text;
use crate::core::entity::{ListItem, RecordId};
use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(alias = "_id")]
    pub id: RecordId,

    pub title: String,

    /// Rich-text body as produced by the editor (HTML)
    #[serde(default)]
    pub content: String,

    #[serde(default = "default_category")]
    pub category: AnnouncementCategory,

    #[serde(default, alias = "createdBy")]
    pub author: Option<Relation>,

    #[serde(default)]
    pub pinned: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_category() -> AnnouncementCategory {
    AnnouncementCategory::General
}

impl Announcement {
    /// First `max_chars` characters of the plain-text body
    pub fn excerpt(&self, max_chars: usize) -> String {
        let text = plain_text(&self.content);
        if text.chars().count() <= max_chars {
            return text;
        }
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push('…');
        cut
    }
}

impl ListItem for Announcement {
    fn resource_name() -> &'static str {
        "announcements"
    }

    fn resource_name_singular() -> &'static str {
        "announcement"
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields() -> &'static [&'static str] {
        &["title", "content", "author_name"]
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["title", "category", "pinned", "created_at"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "id" => FieldValue::text(self.id.as_str()),
            "title" => FieldValue::text(&self.title),
            // Search the visible text, not the markup
            "content" => FieldValue::Text(plain_text(&self.content)),
            "category" => self.category.field_value(),
            "author" => {
                FieldValue::optional(self.author.as_ref(), |rel| FieldValue::text(rel.id.as_str()))
            }
            "author_name" => FieldValue::optional(self.author.as_ref(), |rel| {
                FieldValue::text(rel.display_name())
            }),
            "pinned" => FieldValue::Boolean(self.pinned),
            "created_at" => FieldValue::optional(self.created_at, FieldValue::DateTime),
            _ => return None,
        };
        Some(value)
    }
}
