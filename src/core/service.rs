//! Service trait for remote collections

use crate::core::entity::{ListItem, RecordId};
use crate::core::error::WorkdeskResult;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

/// Named path and query parameters of a list view (`project_id` -> `"p1"`)
pub type PathParams = IndexMap<String, String>;

/// Remote CRUD operations for one resource
///
/// Implementations decide how paths are built and how the backend is
/// reached; list views only see records and errors.
#[async_trait]
pub trait RemoteService<T: ListItem>: Send + Sync {
    /// Resolve the collection path for the given parameters
    ///
    /// Returns `None` while a required parameter is missing or empty, in
    /// which case no request must be made.
    fn collection_path(&self, params: &PathParams) -> Option<String>;

    /// Fetch the whole collection at a resolved path
    async fn list(&self, path: &str) -> WorkdeskResult<Vec<T>>;

    /// Fetch a single record
    async fn get(&self, id: &RecordId) -> WorkdeskResult<T>;

    /// Create a record from a request body
    async fn create(&self, body: &Value) -> WorkdeskResult<T>;

    /// Update a record, returning the stored version
    async fn update(&self, id: &RecordId, body: &Value) -> WorkdeskResult<T>;

    /// Delete a record
    async fn delete(&self, id: &RecordId) -> WorkdeskResult<()>;
}
