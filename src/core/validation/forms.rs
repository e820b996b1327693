//! Form schemas
//!
//! Every form serializes to the request body the backend expects, so a
//! prepared form is sent as-is.

use super::filters::{self, Normalize};
use super::validators;
use crate::core::badge::{EmployeeRole, EmployeeStatus, Priority, ProjectStatus, TaskStatus};
use crate::core::badge::AnnouncementCategory;
use crate::entities::{CompanySettings, Employee, Project, Task};
use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Normalize for LoginForm {
    fn normalize(&mut self) {
        filters::lowercase(&mut self.email);
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskForm {
    #[validate(length(min = 1, max = 200, message = "Title is required (200 characters max)"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: String,

    pub status: TaskStatus,
    pub priority: Priority,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(rename = "project", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date: None,
            project_id: None,
            assigned_to: None,
        }
    }
}

impl From<&Task> for TaskForm {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date.map(|d| d.date_naive()),
            project_id: task.project_id.as_ref().map(|id| id.to_string()),
            assigned_to: task.assigned_to.as_ref().map(|r| r.id.to_string()),
        }
    }
}

impl Normalize for TaskForm {
    fn normalize(&mut self) {
        filters::collapse_whitespace(&mut self.title);
        filters::trim(&mut self.description);
        filters::trim_optional(&mut self.project_id);
        filters::trim_optional(&mut self.assigned_to);
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct EmployeeForm {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    pub role: EmployeeRole,

    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validators::phone"))]
    pub phone: Option<String>,

    pub status: EmployeeStatus,
}

impl Default for EmployeeForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: EmployeeRole::Employee,
            department: String::new(),
            position: None,
            phone: None,
            status: EmployeeStatus::Active,
        }
    }
}

impl From<&Employee> for EmployeeForm {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            email: employee.email.clone(),
            role: employee.role,
            department: employee.department.clone(),
            position: employee.position.clone(),
            phone: employee.phone.clone(),
            status: employee.status,
        }
    }
}

impl Normalize for EmployeeForm {
    fn normalize(&mut self) {
        filters::collapse_whitespace(&mut self.name);
        filters::lowercase(&mut self.email);
        filters::trim(&mut self.department);
        filters::trim_optional(&mut self.position);
        filters::trim_optional(&mut self.phone);
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "project_dates"))]
pub struct ProjectForm {
    #[validate(length(min = 1, max = 150, message = "Project name is required (150 characters max)"))]
    pub name: String,

    pub description: String,

    pub status: ProjectStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    pub members: Vec<String>,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            status: ProjectStatus::Planning,
            start_date: None,
            end_date: None,
            members: Vec::new(),
        }
    }
}

impl From<&Project> for ProjectForm {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status,
            start_date: project.start_date.map(|d| d.date_naive()),
            end_date: project.end_date.map(|d| d.date_naive()),
            members: project.members.iter().map(|m| m.id.to_string()).collect(),
        }
    }
}

impl Normalize for ProjectForm {
    fn normalize(&mut self) {
        filters::collapse_whitespace(&mut self.name);
        filters::trim(&mut self.description);
        self.members.retain(|id| !id.trim().is_empty());
        self.members.dedup();
    }
}

fn project_dates(form: &ProjectForm) -> Result<(), ValidationError> {
    match (form.start_date, form.end_date) {
        (Some(start), Some(end)) if end < start => {
            let mut err = ValidationError::new("end_before_start");
            err.message = Some(Cow::Borrowed("End date cannot be before the start date"));
            err.add_param(Cow::Borrowed("field"), &"end_date");
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct AnnouncementForm {
    #[validate(length(min = 1, max = 200, message = "Title is required (200 characters max)"))]
    pub title: String,

    /// Editor HTML
    #[validate(custom(function = "validators::non_empty_rich_text"))]
    pub content: String,

    pub category: AnnouncementCategory,

    pub pinned: bool,
}

impl Default for AnnouncementForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            category: AnnouncementCategory::General,
            pinned: false,
        }
    }
}

impl Normalize for AnnouncementForm {
    fn normalize(&mut self) {
        filters::collapse_whitespace(&mut self.title);
        filters::trim(&mut self.content);
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SettingsForm {
    #[validate(length(min = 1, max = 120, message = "Company name is required"))]
    pub company_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Enter a valid email address"))]
    pub contact_email: Option<String>,

    #[validate(custom(function = "validators::timezone"))]
    pub timezone: String,

    #[validate(custom(function = "validators::working_days"))]
    pub working_days: Vec<u8>,

    pub email_notifications: bool,
}

impl From<&CompanySettings> for SettingsForm {
    fn from(settings: &CompanySettings) -> Self {
        Self {
            company_name: settings.company_name.clone(),
            contact_email: settings.contact_email.clone(),
            timezone: settings.timezone.clone(),
            working_days: settings.working_days.clone(),
            email_notifications: settings.email_notifications,
        }
    }
}

impl Normalize for SettingsForm {
    fn normalize(&mut self) {
        filters::collapse_whitespace(&mut self.company_name);
        filters::trim_optional(&mut self.contact_email);
        if let Some(email) = &mut self.contact_email {
            filters::lowercase(email);
        }
        filters::trim(&mut self.timezone);
        self.working_days.sort_unstable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ValidationError as FormError, WorkdeskError};
    use crate::core::validation::{prepare, validate_form};

    fn fields(result: crate::core::error::WorkdeskResult<()>) -> Vec<(String, String)> {
        match result {
            Err(WorkdeskError::Validation(FormError::FieldErrors(errors))) => errors
                .into_iter()
                .map(|e| (e.field, e.message))
                .collect(),
            Ok(()) => Vec::new(),
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_task_form_requires_title() {
        let form = TaskForm::default();
        let errors = fields(validate_form(&form));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "title");
    }

    #[test]
    fn test_task_form_serializes_backend_names() {
        let form = TaskForm {
            title: "Prepare Q3 report".to_string(),
            project_id: Some("p1".to_string()),
            assigned_to: Some("e7".to_string()),
            due_date: NaiveDate::from_ymd_opt(2026, 11, 2),
            ..TaskForm::default()
        };

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["project"], "p1");
        assert_eq!(json["assignedTo"], "e7");
        assert_eq!(json["dueDate"], "2026-11-02");
        assert_eq!(json["status"], "todo");
        assert_eq!(json["priority"], "medium");
    }

    #[test]
    fn test_project_end_before_start_is_reported_on_end_date() {
        let form = ProjectForm {
            name: "Website".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 5, 10),
            end_date: NaiveDate::from_ymd_opt(2026, 5, 1),
            ..ProjectForm::default()
        };

        let errors = fields(validate_form(&form));
        assert_eq!(
            errors,
            vec![(
                "end_date".to_string(),
                "End date cannot be before the start date".to_string()
            )]
        );
    }

    #[test]
    fn test_project_same_day_is_valid() {
        let day = NaiveDate::from_ymd_opt(2026, 5, 1);
        let form = ProjectForm {
            name: "Website".to_string(),
            start_date: day,
            end_date: day,
            ..ProjectForm::default()
        };
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn test_announcement_with_empty_markup_is_rejected() {
        let form = AnnouncementForm {
            title: "Holiday".to_string(),
            content: "<p>&nbsp;</p>".to_string(),
            ..AnnouncementForm::default()
        };
        let errors = fields(validate_form(&form));
        assert_eq!(errors[0].0, "content");
        assert_eq!(errors[0].1, "Content cannot be empty");
    }

    #[test]
    fn test_employee_blank_phone_is_dropped_by_prepare() {
        let form = EmployeeForm {
            name: "Jane   Doe".to_string(),
            email: "JANE@example.com".to_string(),
            department: "Ops".to_string(),
            phone: Some("  ".to_string()),
            ..EmployeeForm::default()
        };

        let prepared = prepare(form).unwrap();
        assert_eq!(prepared.name, "Jane Doe");
        assert_eq!(prepared.email, "jane@example.com");
        assert!(prepared.phone.is_none());
    }

    #[test]
    fn test_employee_invalid_phone() {
        let form = EmployeeForm {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            department: "Ops".to_string(),
            phone: Some("abc".to_string()),
            ..EmployeeForm::default()
        };
        let errors = fields(validate_form(&form));
        assert_eq!(errors[0].0, "phone");
    }

    #[test]
    fn test_settings_form_from_settings_is_valid() {
        let settings: CompanySettings =
            serde_json::from_value(serde_json::json!({"companyName": "Acme"})).unwrap();
        let mut form = SettingsForm::from(&settings);
        assert!(validate_form(&form).is_ok());

        form.contact_email = Some("not-an-email".to_string());
        assert_eq!(fields(validate_form(&form))[0].0, "contact_email");
        form.contact_email = Some("hr@acme.test".to_string());

        form.working_days.clear();
        let errors = fields(validate_form(&form));
        assert_eq!(errors[0].0, "working_days");
    }
}
