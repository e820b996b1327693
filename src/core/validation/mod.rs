//! Form validation and normalization
//!
//! Forms are plain structs deriving [`validator::Validate`]. Before a form is
//! submitted it goes through [`prepare`]: string fields are normalized by the
//! filters, then the declarative rules run and any failure is turned into a
//! per-field [`ValidationError::FieldErrors`](crate::core::error::ValidationError)
//! which blocks submission.

pub mod filters;
pub mod forms;
pub mod validators;

pub use filters::Normalize;
pub use forms::{AnnouncementForm, EmployeeForm, LoginForm, ProjectForm, SettingsForm, TaskForm};

use crate::core::error::{FieldValidationError, ValidationError, WorkdeskResult};
use validator::{Validate, ValidationErrors};

/// Key under which struct-level rules report their errors
const SCHEMA_KEY: &str = "__all__";

/// Run the declarative rules of a form
pub fn validate_form<F: Validate>(form: &F) -> WorkdeskResult<()> {
    form.validate()
        .map_err(|errors| ValidationError::FieldErrors(field_errors(&errors)).into())
}

/// Normalize then validate, returning the form ready to submit
pub fn prepare<F: Validate + Normalize>(mut form: F) -> WorkdeskResult<F> {
    form.normalize();
    validate_form(&form)?;
    Ok(form)
}

/// Flatten `validator` errors into one entry per failure, sorted by field
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldValidationError> {
    let mut out: Vec<FieldValidationError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |error| {
                // struct-level rules name the field they are about in a param
                let field = if field == SCHEMA_KEY {
                    error
                        .params
                        .get("field")
                        .and_then(|value| value.as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| field.clone())
                } else {
                    field.clone()
                };
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                FieldValidationError::new(field, message)
            })
        })
        .collect();

    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}
