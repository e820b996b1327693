//! Login and logout flows
//!
//! These are the only writers of the [`SessionContext`]. Each successful
//! transition is persisted through the [`TokenStore`], logged and published
//! as a [`SessionEvent`].

use super::ApiClient;
use crate::core::auth::{CurrentUser, Session, SessionContext, TokenStore, session_cookie};
use crate::core::error::{ApiError, SessionError, WorkdeskResult};
use crate::core::events::{EventBus, SessionEvent, WorkspaceEvent};
use crate::core::validation::{LoginForm, prepare};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
    #[serde(default)]
    user: Option<CurrentUser>,
}

pub struct AuthFlow {
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    events: Option<EventBus>,
    cookie_name: String,
}

impl AuthFlow {
    pub fn new(client: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            store,
            events: None,
            cookie_name: "token".to_string(),
        }
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn session(&self) -> &SessionContext {
        self.client.session()
    }

    /// Load a previously persisted session, returning whether one was found
    pub fn restore(&self) -> WorkdeskResult<bool> {
        match self.store.load()? {
            Some(session) => {
                tracing::debug!("restored persisted session");
                self.session().set(session);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Validate the form, sign in and persist the token
    pub async fn login(&self, form: LoginForm) -> WorkdeskResult<Session> {
        let form = prepare(form)?;
        let data: LoginData = self
            .client
            .post("auth/login", &form)
            .await?
            .ok_or_else(|| ApiError::Decode {
                message: "login response has no token".to_string(),
            })?;

        let session = Session {
            token: data.token,
            user: data.user,
        };
        self.store.save(&session)?;
        self.session().set(session.clone());

        let user_id = session
            .user
            .as_ref()
            .map(|u| u.id.to_string())
            .unwrap_or_default();
        tracing::info!(user_id = %user_id, "signed in");
        self.publish(SessionEvent::LoggedIn { user_id });
        Ok(session)
    }

    /// Fetch the signed-in user and refresh the stored copy
    pub async fn current_user(&self) -> WorkdeskResult<CurrentUser> {
        if !self.session().is_authenticated() {
            return Err(SessionError::NotAuthenticated.into());
        }
        let user: CurrentUser =
            self.client
                .get("auth/me")
                .await?
                .ok_or_else(|| ApiError::Decode {
                    message: "profile response has no data".to_string(),
                })?;

        self.session().set_user(user.clone());
        if let Some(session) = self.session().snapshot() {
            self.store.save(&session)?;
        }
        Ok(user)
    }

    /// Forget the session locally; the token is simply dropped
    pub fn logout(&self) -> WorkdeskResult<()> {
        let was_signed_in = self.session().is_authenticated();
        self.store.clear()?;
        self.session().clear();

        if was_signed_in {
            tracing::info!("signed out");
            self.publish(SessionEvent::LoggedOut);
        }
        Ok(())
    }

    /// `Set-Cookie` value mirroring the current token
    pub fn cookie(&self) -> String {
        session_cookie(&self.cookie_name, self.session().token().as_deref())
    }

    fn publish(&self, event: SessionEvent) {
        if let Some(events) = &self.events {
            events.publish(WorkspaceEvent::Session(event));
        }
    }
}
