//! Session state, token persistence and route protection
//!
//! The [`SessionContext`] is the only state shared between list views. Reads
//! are public; writes go through the login and logout flows in
//! [`crate::client::auth`], which also persist the token through a
//! [`TokenStore`] and keep the cookie mirror up to date.

use crate::config::SessionConfig;
use crate::core::badge::EmployeeRole;
use crate::core::entity::RecordId;
use crate::core::error::{SessionError, WorkdeskResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// The signed-in user as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(alias = "_id")]
    pub id: RecordId,

    #[serde(default, alias = "fullName")]
    pub name: String,

    pub email: String,

    #[serde(default = "default_role")]
    pub role: EmployeeRole,
}

fn default_role() -> EmployeeRole {
    EmployeeRole::Employee
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == EmployeeRole::Admin
    }
}

/// Token plus the user it was issued to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<CurrentUser>,
}

/// Shared, injectable session
///
/// Cloning shares the same underlying session.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bearer token for outgoing requests
    pub fn token(&self) -> Option<String> {
        self.read(|s| s.map(|s| s.token.clone()))
    }

    pub fn user(&self) -> Option<CurrentUser> {
        self.read(|s| s.and_then(|s| s.user.clone()))
    }

    pub fn snapshot(&self) -> Option<Session> {
        self.read(|s| s.cloned())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(|s| s.is_some())
    }

    fn read<R>(&self, f: impl FnOnce(Option<&Session>) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(guard.as_ref())
    }

    pub(crate) fn set(&self, session: Session) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub(crate) fn set_user(&self, user: CurrentUser) {
        if let Some(session) = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            session.user = Some(user);
        }
    }

    pub(crate) fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Client-side persistence of the session
pub trait TokenStore: Send + Sync {
    fn load(&self) -> WorkdeskResult<Option<Session>>;
    fn save(&self, session: &Session) -> WorkdeskResult<()>;
    fn clear(&self) -> WorkdeskResult<()>;
}

/// Session kept in a JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, action: &str, err: impl std::fmt::Display) -> SessionError {
        SessionError::Storage {
            message: format!("cannot {} {}: {}", action, self.path.display(), err),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> WorkdeskResult<Option<Session>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.storage_error("read", e).into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        let session =
            serde_json::from_str(&content).map_err(|e| self.storage_error("parse", e))?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> WorkdeskResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.storage_error("create", e))?;
        }
        let json =
            serde_json::to_string_pretty(session).map_err(|e| self.storage_error("encode", e))?;
        std::fs::write(&self.path, json).map_err(|e| self.storage_error("write", e))?;
        Ok(())
    }

    fn clear(&self) -> WorkdeskResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.storage_error("remove", e).into()),
        }
    }
}

/// Session kept for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<Session>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> WorkdeskResult<Option<Session>> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, session: &Session) -> WorkdeskResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> WorkdeskResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// `Set-Cookie` value mirroring the token, or expiring it when `None`
pub fn session_cookie(name: &str, token: Option<&str>) -> String {
    match token {
        Some(token) => format!("{}={}; Path=/; SameSite=Lax", name, token),
        None => format!("{}=; Path=/; Max-Age=0; SameSite=Lax", name),
    }
}

/// Value of one cookie in a `Cookie` request header
pub fn cookie_value<'h>(header: &'h str, name: &str) -> Option<&'h str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Outcome of a route check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin(String),
    RedirectToHome(String),
}

/// Server-side route protection based on the session cookie
#[derive(Debug, Clone)]
pub struct RouteGuard {
    cookie_name: String,
    login_path: String,
    home_path: String,
    public_paths: Vec<String>,
}

impl RouteGuard {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            login_path: config.login_path.clone(),
            home_path: config.home_path.clone(),
            public_paths: config.public_paths.clone(),
        }
    }

    /// Decide what to do with a request for `path`
    ///
    /// Signed-in users are sent away from the login page; anonymous users are
    /// sent to it from any path that is not public.
    pub fn evaluate(&self, path: &str, cookie_header: Option<&str>) -> RouteDecision {
        let signed_in = cookie_header
            .and_then(|header| cookie_value(header, &self.cookie_name))
            .is_some();

        if signed_in && matches_prefix(path, &self.login_path) {
            return RouteDecision::RedirectToHome(self.home_path.clone());
        }
        if !signed_in && !self.is_public(path) {
            return RouteDecision::RedirectToLogin(self.login_path.clone());
        }
        RouteDecision::Allow
    }

    pub fn is_public(&self, path: &str) -> bool {
        matches_prefix(path, &self.login_path)
            || self.public_paths.iter().any(|p| matches_prefix(path, p))
    }
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path == "/" || path.is_empty();
    }
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'))
}
