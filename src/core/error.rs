//! Typed error handling for workdesk
//!
//! Every fallible operation in the crate returns a [`WorkdeskError`], so callers
//! can match on the category they care about instead of inspecting strings.
//!
//! # Error Categories
//!
//! - [`ApiError`]: Errors talking to the backend (transport, status, envelope)
//! - [`ValidationError`]: Form and parameter validation failures
//! - [`ConfigError`]: Errors related to configuration parsing and validation
//! - [`SessionError`]: Errors related to the authentication session
//!
//! # Example
//!
//! ```rust,ignore
//! use workdesk::prelude::*;
//!
//! match client.get_envelope::<Vec<Task>>("/tasks", &[]).await {
//!     Ok(envelope) => println!("{} tasks", envelope.data.unwrap_or_default().len()),
//!     Err(WorkdeskError::Api(ApiError::Status { status: 401, .. })) => {
//!         println!("Session expired");
//!     }
//!     Err(e) => eprintln!("{}", e.user_message()),
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// Message shown when the backend gave no usable explanation
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// The main error type for workdesk
#[derive(Debug)]
pub enum WorkdeskError {
    /// Backend communication errors
    Api(ApiError),

    /// Validation errors
    Validation(ValidationError),

    /// Configuration errors
    Config(ConfigError),

    /// Session errors
    Session(SessionError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for WorkdeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkdeskError::Api(e) => write!(f, "{}", e),
            WorkdeskError::Validation(e) => write!(f, "{}", e),
            WorkdeskError::Config(e) => write!(f, "{}", e),
            WorkdeskError::Session(e) => write!(f, "{}", e),
            WorkdeskError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for WorkdeskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkdeskError::Api(e) => Some(e),
            WorkdeskError::Validation(e) => Some(e),
            WorkdeskError::Config(e) => Some(e),
            WorkdeskError::Session(e) => Some(e),
            WorkdeskError::Internal(_) => None,
        }
    }
}

impl WorkdeskError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            WorkdeskError::Api(e) => e.error_code(),
            WorkdeskError::Validation(_) => "VALIDATION_ERROR",
            WorkdeskError::Config(_) => "CONFIG_ERROR",
            WorkdeskError::Session(e) => e.error_code(),
            WorkdeskError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Text suitable for a user-facing notification
    ///
    /// Backend-provided messages are shown verbatim. Anything else that has no
    /// meaningful text for an end user collapses to [`GENERIC_FAILURE_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            WorkdeskError::Api(ApiError::Status {
                message: Some(message),
                ..
            })
            | WorkdeskError::Api(ApiError::Rejected {
                message: Some(message),
            }) if !message.trim().is_empty() => message.clone(),
            WorkdeskError::Api(ApiError::Transport { timed_out: true, .. }) => {
                "The server took too long to respond.".to_string()
            }
            WorkdeskError::Validation(e) => e.to_string(),
            WorkdeskError::Session(SessionError::NotAuthenticated) => {
                "Please sign in to continue.".to_string()
            }
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Field-level details for validation failures
    pub fn field_errors(&self) -> &[FieldValidationError] {
        match self {
            WorkdeskError::Validation(ValidationError::FieldErrors(errors)) => errors,
            _ => &[],
        }
    }
}

// =============================================================================
// API Errors
// =============================================================================

/// Errors raised while talking to the backend
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, connection, timeout)
    Transport { message: String, timed_out: bool },

    /// The backend answered with a non-2xx status
    Status {
        status: u16,
        message: Option<String>,
    },

    /// The backend answered 2xx but the envelope carried `success: false`
    Rejected { message: Option<String> },

    /// The body was not the expected envelope
    Decode { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport { message, timed_out } => {
                if *timed_out {
                    write!(f, "Request timed out: {}", message)
                } else {
                    write!(f, "Request failed: {}", message)
                }
            }
            ApiError::Status { status, message } => match message {
                Some(message) => write!(f, "Backend returned {}: {}", status, message),
                None => write!(f, "Backend returned {}", status),
            },
            ApiError::Rejected { message } => match message {
                Some(message) => write!(f, "Backend rejected the request: {}", message),
                None => write!(f, "Backend rejected the request"),
            },
            ApiError::Decode { message } => {
                write!(f, "Unexpected response body: {}", message)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Transport {
                timed_out: true, ..
            } => "API_TIMEOUT",
            ApiError::Transport { .. } => "API_TRANSPORT_ERROR",
            ApiError::Status { .. } => "API_STATUS_ERROR",
            ApiError::Rejected { .. } => "API_REJECTED",
            ApiError::Decode { .. } => "API_DECODE_ERROR",
        }
    }

    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for WorkdeskError {
    fn from(err: ApiError) -> Self {
        WorkdeskError::Api(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    InvalidJson { message: String },

    /// A required path or query parameter was absent
    MissingParameter { parameter: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
            ValidationError::MissingParameter { parameter } => {
                write!(f, "Missing required parameter: {}", parameter)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for WorkdeskError {
    fn from(err: ValidationError) -> Self {
        WorkdeskError::Validation(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for WorkdeskError {
    fn from(err: ConfigError) -> Self {
        WorkdeskError::Config(err)
    }
}

// =============================================================================
// Session Errors
// =============================================================================

/// Errors related to the authentication session
#[derive(Debug)]
pub enum SessionError {
    /// An operation needed a token but nobody is signed in
    NotAuthenticated,

    /// The token store could not be read or written
    Storage { message: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotAuthenticated => write!(f, "Not authenticated"),
            SessionError::Storage { message } => {
                write!(f, "Token storage error: {}", message)
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl SessionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotAuthenticated => "NOT_AUTHENTICATED",
            SessionError::Storage { .. } => "SESSION_STORAGE_ERROR",
        }
    }
}

impl From<SessionError> for WorkdeskError {
    fn from(err: SessionError) -> Self {
        WorkdeskError::Session(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for WorkdeskError {
    fn from(err: serde_json::Error) -> Self {
        WorkdeskError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for WorkdeskError {
    fn from(err: std::io::Error) -> Self {
        WorkdeskError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for WorkdeskError {
    fn from(err: serde_yaml::Error) -> Self {
        WorkdeskError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<reqwest::Error> for WorkdeskError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return WorkdeskError::Api(ApiError::Decode {
                message: err.to_string(),
            });
        }
        if let Some(status) = err.status() {
            return WorkdeskError::Api(ApiError::Status {
                status: status.as_u16(),
                message: None,
            });
        }
        WorkdeskError::Api(ApiError::Transport {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for WorkdeskError {
    fn from(err: anyhow::Error) -> Self {
        WorkdeskError::Internal(err.to_string())
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for workdesk operations
pub type WorkdeskResult<T> = Result<T, WorkdeskError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 404,
            message: Some("Project not found".to_string()),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Project not found"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = WorkdeskError::Api(ApiError::Rejected {
            message: Some("X".to_string()),
        });
        assert_eq!(err.user_message(), "X");
    }

    #[test]
    fn test_user_message_falls_back_to_generic() {
        let err = WorkdeskError::Api(ApiError::Status {
            status: 500,
            message: None,
        });
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let blank = WorkdeskError::Api(ApiError::Rejected {
            message: Some("   ".to_string()),
        });
        assert_eq!(blank.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_timeout_has_its_own_code_and_message() {
        let err = WorkdeskError::Api(ApiError::Transport {
            message: "deadline".to_string(),
            timed_out: true,
        });
        assert_eq!(err.error_code(), "API_TIMEOUT");
        assert!(err.user_message().contains("too long"));
    }

    #[test]
    fn test_validation_error_multiple_fields() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "title".to_string(),
                message: "required".to_string(),
            },
            FieldValidationError {
                field: "email".to_string(),
                message: "invalid format".to_string(),
            },
        ]);
        let display = err.to_string();
        assert!(display.contains("title"));
        assert!(display.contains("email"));

        let err: WorkdeskError = err.into();
        assert_eq!(err.field_errors().len(), 2);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_config_error() {
        let err = ConfigError::FileNotFound {
            path: "/etc/workdesk.yaml".to_string(),
        };
        assert!(err.to_string().contains("/etc/workdesk.yaml"));
    }

    #[test]
    fn test_session_error_codes() {
        let err: WorkdeskError = SessionError::NotAuthenticated.into();
        assert_eq!(err.error_code(), "NOT_AUTHENTICATED");
        assert!(err.user_message().contains("sign in"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: WorkdeskError = json_err.into();
        assert!(matches!(
            err,
            WorkdeskError::Validation(ValidationError::InvalidJson { .. })
        ));
    }
}
