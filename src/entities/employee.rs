//! Employee records managed from the admin dashboard

use crate::core::badge::{ClosedEnum, EmployeeRole, EmployeeStatus};
use crate::core::entity::{ListItem, RecordId};
use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(alias = "_id")]
    pub id: RecordId,

    pub name: String,

    pub email: String,

    #[serde(default = "default_role")]
    pub role: EmployeeRole,

    #[serde(default)]
    pub department: String,

    #[serde(default)]
    pub position: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default = "default_status")]
    pub status: EmployeeStatus,

    #[serde(default, alias = "createdAt")]
    pub joined_at: Option<DateTime<Utc>>,
}

fn default_role() -> EmployeeRole {
    EmployeeRole::Employee
}

fn default_status() -> EmployeeStatus {
    EmployeeStatus::Active
}

impl ListItem for Employee {
    fn resource_name() -> &'static str {
        "employees"
    }

    fn resource_name_singular() -> &'static str {
        "employee"
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields() -> &'static [&'static str] {
        &["name", "email", "department", "position"]
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["name", "email", "role", "department", "status", "joined_at"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "id" => FieldValue::text(self.id.as_str()),
            "name" => FieldValue::text(&self.name),
            "email" => FieldValue::text(&self.email),
            "role" => self.role.field_value(),
            "department" => FieldValue::text(&self.department),
            "position" => FieldValue::optional(self.position.as_deref(), FieldValue::text),
            "phone" => FieldValue::optional(self.phone.as_deref(), FieldValue::text),
            "status" => self.status.field_value(),
            "joined_at" => FieldValue::optional(self.joined_at, FieldValue::DateTime),
            _ => return None,
        };
        Some(value)
    }
}
