//! REST implementation of [`RemoteService`]

use super::endpoint::{Endpoint, relative_url};
use super::ApiClient;
use crate::core::entity::{ListItem, RecordId};
use crate::core::error::{ApiError, WorkdeskError, WorkdeskResult};
use crate::core::service::{PathParams, RemoteService};
use crate::entities::CompanySettings;
use crate::core::validation::{SettingsForm, prepare};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// CRUD over `/{resource}` for one item type
///
/// The collection endpoint defaults to `/{resource}` and can be replaced by
/// a parameterised one (`/projects/{project_id}/tasks`); single records are
/// always addressed as `/{resource}/{id}`.
#[derive(Debug, Clone)]
pub struct RestService<T> {
    client: ApiClient,
    collection: Endpoint,
    _item: PhantomData<fn() -> T>,
}

impl<T: ListItem + DeserializeOwned> RestService<T> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            collection: Endpoint::new(format!("/{}", T::resource_name())),
            _item: PhantomData,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.collection = endpoint;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.collection
    }

    fn item_path(&self, id: &RecordId) -> WorkdeskResult<String> {
        relative_url(&[T::resource_name(), id.as_str()], &[])
            .ok_or_else(|| WorkdeskError::Internal(format!("unaddressable record id '{}'", id)))
    }
}

fn missing_data(operation: &str) -> ApiError {
    ApiError::Decode {
        message: format!("{} response has no data", operation),
    }
}

#[async_trait]
impl<T: ListItem + DeserializeOwned> RemoteService<T> for RestService<T> {
    fn collection_path(&self, params: &PathParams) -> Option<String> {
        self.collection.resolve(params)
    }

    async fn list(&self, path: &str) -> WorkdeskResult<Vec<T>> {
        Ok(self.client.get::<Vec<T>>(path).await?.unwrap_or_default())
    }

    async fn get(&self, id: &RecordId) -> WorkdeskResult<T> {
        self.client
            .get(&self.item_path(id)?)
            .await?
            .ok_or_else(|| missing_data("get").into())
    }

    async fn create(&self, body: &Value) -> WorkdeskResult<T> {
        self.client
            .post(T::resource_name(), body)
            .await?
            .ok_or_else(|| missing_data("create").into())
    }

    async fn update(&self, id: &RecordId, body: &Value) -> WorkdeskResult<T> {
        self.client
            .put(&self.item_path(id)?, body)
            .await?
            .ok_or_else(|| missing_data("update").into())
    }

    async fn delete(&self, id: &RecordId) -> WorkdeskResult<()> {
        self.client.delete(&self.item_path(id)?).await
    }
}

/// Company settings live at a single `/settings` document
#[derive(Debug, Clone)]
pub struct SettingsService {
    client: ApiClient,
}

impl SettingsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn load(&self) -> WorkdeskResult<CompanySettings> {
        self.client
            .get("settings")
            .await?
            .ok_or_else(|| missing_data("settings").into())
    }

    /// Validate and save the form; invalid forms never reach the backend
    pub async fn save(&self, form: SettingsForm) -> WorkdeskResult<CompanySettings> {
        let form = prepare(form)?;
        self.client
            .put("settings", &form)
            .await?
            .ok_or_else(|| missing_data("settings").into())
    }
}
