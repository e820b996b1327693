//! Projects managed from the admin dashboard

use super::Relation;
use crate::core::badge::{ClosedEnum, ProjectStatus};
use crate::core::entity::{ListItem, RecordId};
use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(alias = "_id")]
    pub id: RecordId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_status")]
    pub status: ProjectStatus,

    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default, alias = "team", alias = "employees")]
    pub members: Vec<Relation>,
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Planning
}

impl Project {
    pub fn has_member(&self, id: &RecordId) -> bool {
        self.members.iter().any(|m| &m.id == id)
    }
}

impl ListItem for Project {
    fn resource_name() -> &'static str {
        "projects"
    }

    fn resource_name_singular() -> &'static str {
        "project"
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields() -> &'static [&'static str] {
        &["name", "description"]
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["name", "status", "start_date", "end_date", "member_count"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "id" => FieldValue::text(self.id.as_str()),
            "name" => FieldValue::text(&self.name),
            "description" => FieldValue::text(&self.description),
            "status" => self.status.field_value(),
            "start_date" => FieldValue::optional(self.start_date, FieldValue::DateTime),
            "end_date" => FieldValue::optional(self.end_date, FieldValue::DateTime),
            "member_count" => FieldValue::Integer(self.members.len() as i64),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_members_accept_ids_and_objects() {
        let project: Project = serde_json::from_value(json!({
            "_id": "p-1",
            "name": "Website relaunch",
            "status": "ongoing",
            "team": ["u-1", {"_id": "u-2", "name": "Ada"}],
        }))
        .unwrap();

        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.members.len(), 2);
        assert!(project.has_member(&RecordId::new("u-2")));
        assert_eq!(project.field_value("member_count"), Some(FieldValue::Integer(2)));
    }
}
