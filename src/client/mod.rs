//! REST client for the CMS backend
//!
//! Every backend response is wrapped in an [`Envelope`]. The client turns
//! transport failures, non-2xx statuses, `success: false` envelopes and
//! undecodable bodies into [`ApiError`] values, extracting the backend's
//! message where one is present.

pub mod auth;
pub mod endpoint;
pub mod rest;

pub use auth::AuthFlow;
pub use endpoint::Endpoint;
pub use rest::RestService;

use crate::config::WorkdeskConfig;
use crate::core::auth::SessionContext;
use crate::core::error::{ApiError, WorkdeskError, WorkdeskResult};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{success, message?, data?}` wrapper used by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Data of a successful envelope, or the rejection as an error
    pub fn into_result(self) -> WorkdeskResult<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected {
                message: self.message,
            }
            .into())
        }
    }
}

/// Best-effort message from an error response body
///
/// Looks for `message`, then `error`, in a JSON body.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

/// Authenticated HTTP client bound to one backend
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(config: &WorkdeskConfig, session: SessionContext) -> WorkdeskResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.api.timeout())
            .user_agent(config.api.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url()?,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> WorkdeskResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| WorkdeskError::Internal(format!("invalid request path '{}': {}", path, e)))
    }

    /// GET `path` and unwrap the envelope
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> WorkdeskResult<Option<T>> {
        self.request::<Value, T>(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> WorkdeskResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> WorkdeskResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> WorkdeskResult<()> {
        self.request::<Value, Value>(Method::DELETE, path, None)
            .await
            .map(|_| ())
    }

    /// Send one request with the session's bearer token
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> WorkdeskResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let mut request = self.http.request(method.clone(), url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(method = %method, path, "sending request");
        let response = request.send().await.inspect_err(|e| {
            tracing::debug!(method = %method, path, error = %e, "request failed");
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&bytes);
            tracing::debug!(method = %method, path, status = status.as_u16(), "backend returned an error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let envelope: Envelope<T> =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
                message: e.to_string(),
            })?;
        tracing::debug!(method = %method, path, status = status.as_u16(), success = envelope.success, "response received");
        envelope.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_success_without_data() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(envelope.into_result().unwrap(), None);
    }

    #[test]
    fn test_envelope_without_data_for_record_payload() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Record {
            name: String,
        }

        let envelope: Envelope<Record> =
            serde_json::from_value(json!({"success": true, "message": "Deleted"})).unwrap();
        assert_eq!(envelope.message.as_deref(), Some("Deleted"));
        assert_eq!(envelope.into_result().unwrap(), None);

        let envelope: Envelope<Record> =
            serde_json::from_value(json!({"success": true, "data": {"name": "Ada"}})).unwrap();
        assert_eq!(
            envelope.into_result().unwrap(),
            Some(Record {
                name: "Ada".to_string()
            })
        );
    }

    #[test]
    fn test_envelope_rejection_keeps_message() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_value(json!({"success": false, "message": "X"})).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.user_message(), "X");
        assert_eq!(err.error_code(), "API_REJECTED");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(br#"{"success":false,"message":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(
            error_message(br#"{"error":"Not found"}"#).as_deref(),
            Some("Not found")
        );
        assert_eq!(error_message(br#"{"message":"  "}"#), None);
        assert_eq!(error_message(b"<html>Bad gateway</html>"), None);
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let mut config = WorkdeskConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(ApiClient::new(&config, SessionContext::new()).is_err());
    }

    #[test]
    fn test_url_join_keeps_base_path() {
        let mut config = WorkdeskConfig::default();
        config.api.base_url = "https://cms.example.com/api".to_string();
        let client = ApiClient::new(&config, SessionContext::new()).unwrap();
        assert_eq!(
            client.url("/projects/p1/tasks").unwrap().as_str(),
            "https://cms.example.com/api/projects/p1/tasks"
        );
    }
}
