//! Company-wide settings edited from the admin dashboard

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    pub company_name: String,

    #[serde(default)]
    pub contact_email: Option<String>,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// ISO weekday numbers, Monday = 1
    #[serde(default = "default_working_days")]
    pub working_days: Vec<u8>,

    #[serde(default = "default_true")]
    pub email_notifications: bool,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_working_days() -> Vec<u8> {
    vec![1, 2, 3, 4, 5]
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings: CompanySettings =
            serde_json::from_value(json!({"companyName": "Acme"})).unwrap();
        assert_eq!(settings.timezone, "UTC");
        assert_eq!(settings.working_days, vec![1, 2, 3, 4, 5]);
        assert!(settings.email_notifications);
    }
}
