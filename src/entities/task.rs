//! Task records of the company workspace

use super::Relation;
use crate::core::badge::{ClosedEnum, Priority, TaskStatus};
use crate::core::entity::{ListItem, RecordId};
use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: RecordId,

    pub title: String,

    #[serde(default)]
    pub description: String,

    pub status: TaskStatus,

    #[serde(default = "default_priority")]
    pub priority: Priority,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default, alias = "project")]
    pub project_id: Option<RecordId>,

    #[serde(default)]
    pub assigned_to: Option<Relation>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_priority() -> Priority {
    Priority::Medium
}

impl Task {
    /// Whether the due date has passed on an unfinished task
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Done && self.due_date.is_some_and(|due| due < now)
    }
}

impl ListItem for Task {
    fn resource_name() -> &'static str {
        "tasks"
    }

    fn resource_name_singular() -> &'static str {
        "task"
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields() -> &'static [&'static str] {
        &["title", "description", "assignee_name"]
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["title", "status", "priority", "due_date", "created_at"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "id" => FieldValue::text(self.id.as_str()),
            "title" => FieldValue::text(&self.title),
            "description" => FieldValue::text(&self.description),
            "status" => self.status.field_value(),
            "priority" => self.priority.field_value(),
            "due_date" => FieldValue::optional(self.due_date, FieldValue::DateTime),
            "created_at" => FieldValue::optional(self.created_at, FieldValue::DateTime),
            "project_id" => {
                FieldValue::optional(self.project_id.as_ref(), |id| FieldValue::text(id.as_str()))
            }
            "assigned_to" => FieldValue::optional(self.assigned_to.as_ref(), |rel| {
                FieldValue::text(rel.id.as_str())
            }),
            "assignee_name" => FieldValue::optional(self.assigned_to.as_ref(), |rel| {
                FieldValue::text(rel.display_name())
            }),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> Task {
        serde_json::from_value(json!({
            "_id": "t-1",
            "title": "Write report",
            "description": "Quarterly numbers",
            "status": "completed",
            "priority": "high",
            "dueDate": "2024-05-01T00:00:00Z",
            "project": "p-9",
            "assignedTo": {"_id": "u-1", "name": "Ada"},
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_backend_shape() {
        let task = sample();
        assert_eq!(task.id.as_str(), "t-1");
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.project_id, Some(RecordId::new("p-9")));
        assert_eq!(task.assigned_to, Some(Relation::named("u-1", "Ada")));
        assert!(task.created_at.is_none());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let task: Task = serde_json::from_value(json!({
            "id": "t-2",
            "title": "Minimal",
            "status": "todo",
        }))
        .unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.description.is_empty());
        assert_eq!(task.field_value("due_date"), Some(FieldValue::Null));
    }

    #[test]
    fn test_field_values() {
        let task = sample();
        assert_eq!(task.field_value("assigned_to"), Some(FieldValue::text("u-1")));
        assert_eq!(task.field_value("assignee_name"), Some(FieldValue::text("Ada")));
        assert_eq!(task.field_value("status"), Some(TaskStatus::Done.field_value()));
        assert_eq!(task.field_value("unknown"), None);
        assert_eq!(task.label(), "Write report");
    }

    #[test]
    fn test_overdue_ignores_finished_tasks() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut task = sample();
        assert!(!task.is_overdue(now));

        task.status = TaskStatus::InProgress;
        assert!(task.is_overdue(now));
    }
}
