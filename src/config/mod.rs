//! Configuration loading and management
//!
//! Configuration comes from YAML files, optionally several merged together,
//! then environment overrides. Every section has defaults, so an empty file
//! (or no file) is a valid configuration pointing at a local backend.
//!
//! ```yaml
//! api:
//!   base_url: https://cms.example.com/api
//!   timeout_secs: 10
//! session:
//!   token_path: ~/.config/workdesk/token.json
//! list:
//!   page_size: 25
//! logging:
//!   filter: workdesk=debug
//! ```

use crate::core::error::{ConfigError, WorkdeskResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_API_URL: &str = "WORKDESK_API_URL";
pub const ENV_TOKEN_PATH: &str = "WORKDESK_TOKEN_PATH";
pub const ENV_TIMEOUT_SECS: &str = "WORKDESK_TIMEOUT_SECS";

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 15,
            user_agent: concat!("workdesk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Session persistence and route protection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the token is persisted; in-memory only when unset
    pub token_path: Option<PathBuf>,

    /// Cookie mirroring the token for server-side route checks
    pub cookie_name: String,

    pub login_path: String,

    /// Where a signed-in user visiting the login page is sent
    pub home_path: String,

    /// Paths reachable without a token (prefix match)
    pub public_paths: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: None,
            cookie_name: "token".to_string(),
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            public_paths: vec![
                "/login".to_string(),
                "/forgot-password".to_string(),
                "/reset-password".to_string(),
            ],
        }
    }
}

/// List view settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub page_size: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

/// Logging settings, used when `RUST_LOG` is not set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkdeskConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub list: ListConfig,
    pub logging: LoggingConfig,
}

impl WorkdeskConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> WorkdeskResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::IoError {
                    message: e.to_string(),
                }
            }
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> WorkdeskResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Merge several configurations; later ones win for every value that
    /// differs from the default
    pub fn merge(configs: Vec<WorkdeskConfig>) -> Self {
        let defaults = Self::default();
        let mut merged = Self::default();

        for config in configs {
            macro_rules! take {
                ($($section:ident . $field:ident),+ $(,)?) => {
                    $(
                        if config.$section.$field != defaults.$section.$field {
                            merged.$section.$field = config.$section.$field;
                        }
                    )+
                };
            }

            take!(
                api.base_url,
                api.timeout_secs,
                api.user_agent,
                session.token_path,
                session.cookie_name,
                session.login_path,
                session.home_path,
                session.public_paths,
                list.page_size,
                logging.filter,
            );
        }

        merged
    }

    /// Apply `WORKDESK_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> WorkdeskResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment in production)
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> WorkdeskResult<()> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(path) = lookup(ENV_TOKEN_PATH) {
            self.session.token_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.api.timeout_secs = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_TIMEOUT_SECS.to_string(),
                value: secs.clone(),
                message: "expected a whole number of seconds".to_string(),
            })?;
        }
        Ok(())
    }

    /// Check values that cannot be expressed in the types
    pub fn validate(&self) -> WorkdeskResult<()> {
        self.base_url()?;
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".to_string(),
                value: "0".to_string(),
                message: "timeout must be at least one second".to_string(),
            }
            .into());
        }
        if self.list.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "list.page_size".to_string(),
                value: "0".to_string(),
                message: "page size must be positive".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Parsed base URL, always ending with a slash so joins keep its path
    pub fn base_url(&self) -> WorkdeskResult<Url> {
        let raw = self.api.base_url.trim();
        let invalid = |message: &str| ConfigError::InvalidValue {
            field: "api.base_url".to_string(),
            value: raw.to_string(),
            message: message.to_string(),
        };

        let mut url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("only http and https are supported").into());
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}
