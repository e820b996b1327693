//! List view state machine
//!
//! ```text
//! Idle ──refresh──▶ Loading ──ok──▶ Loaded ──refresh──▶ Loading
//!                      │                                   │
//!                      └──err──▶ Failed ◀──────err─────────┘
//! ```
//!
//! A failed load keeps the previous collection on screen and reports the
//! error through the [`Notifier`]. Filtering, sorting and paging never touch
//! the network: they only change how the collection is projected.

use super::fetcher::CollectionFetcher;
use crate::core::badge::{ClosedEnum, TaskStatus};
use crate::core::entity::{ListItem, RecordId};
use crate::core::error::WorkdeskResult;
use crate::core::events::{CollectionEvent, EventBus, WorkspaceEvent};
use crate::core::notify::{Notification, Notifier};
use crate::core::query::{
    self, Direction, FilterState, MAX_PAGE_SIZE, PaginationMeta, SortState,
};
use crate::core::service::{PathParams, RemoteService};
use crate::core::validation::{Normalize, prepare};
use crate::entities::Task;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use validator::Validate;

/// Network state of a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// What the table should display
#[derive(Debug)]
pub enum ListPresentation<'a, T> {
    /// First load still running
    Loading,
    /// First load failed and there is nothing to show
    Error(String),
    /// The collection is empty
    NoData,
    /// The collection has items but none pass the filters
    NoMatches,
    Rows {
        rows: Vec<&'a T>,
        meta: PaginationMeta,
    },
}

impl<T> ListPresentation<'_, T> {
    pub fn rows(&self) -> &[&T] {
        match self {
            ListPresentation::Rows { rows, .. } => rows,
            _ => &[],
        }
    }
}

pub struct ListView<T: ListItem> {
    fetcher: CollectionFetcher<T>,
    notifier: Arc<dyn Notifier>,
    events: Option<EventBus>,
    collection: Vec<T>,
    state: LoadState,
    error: Option<String>,
    has_loaded: bool,
    filter: FilterState,
    sort: SortState,
    page: usize,
    page_size: usize,
    notify_load_success: bool,
}

impl<T: ListItem> ListView<T> {
    pub fn new(service: Arc<dyn RemoteService<T>>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            fetcher: CollectionFetcher::new(service),
            notifier,
            events: None,
            collection: Vec::new(),
            state: LoadState::Idle,
            error: None,
            has_loaded: false,
            filter: FilterState::new(),
            sort: SortState::default(),
            page: 1,
            page_size: 10,
            notify_load_success: true,
        }
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_params(mut self, params: PathParams) -> Self {
        for (name, value) in params {
            self.fetcher.set_param(name, value);
        }
        self
    }

    /// Toast successful loads as well as failures (on by default)
    pub fn with_load_notifications(mut self, enabled: bool) -> Self {
        self.notify_load_success = enabled;
        self
    }

    // ---- state ----

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Message of the last failed load, cleared by the next success
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The full, unfiltered collection
    pub fn items(&self) -> &[T] {
        &self.collection
    }

    pub fn generation(&self) -> u64 {
        self.fetcher.generation()
    }

    pub fn params(&self) -> &PathParams {
        self.fetcher.params()
    }

    /// Change a path or query parameter
    ///
    /// Returns whether the value changed; the caller reloads when it did.
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        self.fetcher.set_param(name, value)
    }

    pub fn remove_param(&mut self, name: &str) -> bool {
        self.fetcher.remove_param(name)
    }

    // ---- loading ----

    /// Load the collection and wait for the result
    ///
    /// Returns whether the collection was replaced.
    pub async fn refresh(&mut self) -> bool {
        let Some(request) = self.fetcher.begin() else {
            self.skip_load();
            return false;
        };
        self.state = LoadState::Loading;
        let result = self.fetcher.run(&request).await;
        self.apply(request.generation, result)
    }

    /// Start loading in the background, superseding any load in flight
    ///
    /// Returns whether a request was started. Results are applied by
    /// [`poll`](Self::poll) or [`wait`](Self::wait).
    pub fn spawn_refresh(&mut self) -> bool {
        let Some(request) = self.fetcher.begin() else {
            self.skip_load();
            return false;
        };
        self.state = LoadState::Loading;
        self.fetcher.spawn(request);
        true
    }

    /// Apply background results that already arrived
    pub fn poll(&mut self) -> bool {
        let mut applied = false;
        for (generation, result) in self.fetcher.try_completed() {
            applied |= self.apply(generation, result);
        }
        applied
    }

    /// Wait until the current background load has been applied
    pub async fn wait(&mut self) -> bool {
        while let Some((generation, result)) = self.fetcher.next_completed().await {
            if self.apply(generation, result) {
                return true;
            }
            if self.state != LoadState::Loading {
                return false;
            }
        }
        false
    }

    /// Required parameters are missing: nothing to show, nothing to report
    fn skip_load(&mut self) {
        tracing::debug!(resource = T::resource_name(), "missing parameters, load skipped");
        self.collection.clear();
        self.has_loaded = false;
        self.error = None;
        self.state = LoadState::Idle;
    }

    /// Apply a completed load; stale generations are dropped
    ///
    /// Returns whether the collection was replaced.
    pub fn apply(&mut self, generation: u64, result: WorkdeskResult<Vec<T>>) -> bool {
        if !self.fetcher.is_current(generation) {
            tracing::debug!(
                resource = T::resource_name(),
                generation,
                current = self.fetcher.generation(),
                "discarding stale response"
            );
            return false;
        }

        match result {
            Ok(items) => {
                let count = items.len();
                self.collection = items;
                self.state = LoadState::Loaded;
                self.error = None;
                self.has_loaded = true;
                self.clamp_page();

                tracing::debug!(resource = T::resource_name(), generation, count, "collection replaced");
                if self.notify_load_success {
                    self.notifier.notify(Notification::success(format!(
                        "Loaded {} {}",
                        count,
                        T::resource_name()
                    )));
                }
                self.publish(CollectionEvent::Replaced {
                    resource: T::resource_name().to_string(),
                    generation,
                    count,
                });
                true
            }
            Err(err) => {
                let message = err.user_message();
                tracing::warn!(
                    resource = T::resource_name(),
                    generation,
                    code = err.error_code(),
                    error = %err,
                    "load failed"
                );
                self.state = LoadState::Failed;
                self.error = Some(message.clone());
                self.notifier.notify(Notification::error(message.clone()));
                self.publish(CollectionEvent::LoadFailed {
                    resource: T::resource_name().to_string(),
                    generation,
                    message,
                });
                false
            }
        }
    }

    // ---- filtering, sorting, paging ----

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.set_search(search);
        self.page = 1;
    }

    /// Equality constraint on an enum field; `"all"` or empty clears it
    pub fn set_enum_filter(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.filter.set_enum(field, value);
        self.page = 1;
    }

    pub fn set_relation_filter(&mut self, field: impl Into<String>, id: Option<String>) {
        self.filter.set_relation(field, id);
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.page = 1;
    }

    /// Header click: flip the active field, or sort ascending by a new one
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort.toggle(field);
    }

    pub fn set_sort(&mut self, field: impl Into<String>, direction: Direction) {
        self.sort = SortState::by(field, direction);
    }

    pub fn clear_sort(&mut self) {
        self.sort.clear();
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Go to `page`, clamped to the pages of the current view
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        let meta = PaginationMeta::new(self.page, self.page_size, self.view().len());
        if meta.total_pages > 0 && self.page > meta.total_pages {
            self.page = meta.total_pages;
        }
    }

    /// Filtered and sorted projection of the collection
    pub fn view(&self) -> Vec<&T> {
        query::derive_view(&self.collection, &self.filter, &self.sort)
    }

    /// Rows of the current page
    pub fn current_page(&self) -> (Vec<&T>, PaginationMeta) {
        let view = self.view();
        let page = query::paginate(&view, self.page, self.page_size);
        (page.items.to_vec(), page.meta)
    }

    pub fn presentation(&self) -> ListPresentation<'_, T> {
        if self.collection.is_empty() {
            return match self.state {
                LoadState::Loading if !self.has_loaded => ListPresentation::Loading,
                LoadState::Failed if !self.has_loaded => ListPresentation::Error(
                    self.error.clone().unwrap_or_default(),
                ),
                _ => ListPresentation::NoData,
            };
        }

        let (rows, meta) = self.current_page();
        if meta.total == 0 {
            ListPresentation::NoMatches
        } else {
            ListPresentation::Rows { rows, meta }
        }
    }

    // ---- row mutations ----

    /// Create a record; it is appended once the backend confirms
    pub async fn create_row(&mut self, body: Value) -> bool {
        match self.fetcher.service().create(&body).await {
            Ok(created) => {
                let id = created.id().to_string();
                self.collection.push(created);
                self.notify_done("created");
                self.publish(CollectionEvent::RowUpdated {
                    resource: T::resource_name().to_string(),
                    id,
                });
                true
            }
            Err(err) => {
                self.notify_failure("create", &err);
                false
            }
        }
    }

    /// Update a record; the stored version replaces the row once confirmed
    pub async fn update_row(&mut self, id: &RecordId, body: Value) -> bool {
        match self.fetcher.service().update(id, &body).await {
            Ok(updated) => {
                if let Some(row) = self.collection.iter_mut().find(|row| row.id() == id) {
                    *row = updated;
                }
                self.notify_done("updated");
                self.publish(CollectionEvent::RowUpdated {
                    resource: T::resource_name().to_string(),
                    id: id.to_string(),
                });
                true
            }
            Err(err) => {
                self.notify_failure("update", &err);
                false
            }
        }
    }

    /// Delete a record; the row is removed once the backend confirms
    pub async fn delete_row(&mut self, id: &RecordId) -> bool {
        match self.fetcher.service().delete(id).await {
            Ok(()) => {
                self.collection.retain(|row| row.id() != id);
                self.clamp_page();
                self.notify_done("deleted");
                self.publish(CollectionEvent::RowDeleted {
                    resource: T::resource_name().to_string(),
                    id: id.to_string(),
                });
                true
            }
            Err(err) => {
                self.notify_failure("delete", &err);
                false
            }
        }
    }

    /// Validate a form and create (`id` is `None`) or update the record
    ///
    /// Validation errors are returned for inline display and nothing is
    /// sent. Backend failures are notified like any other mutation and
    /// yield `Ok(false)`.
    pub async fn submit<F>(&mut self, id: Option<&RecordId>, form: F) -> WorkdeskResult<bool>
    where
        F: Validate + Normalize + Serialize,
    {
        let form = prepare(form)?;
        let body = serde_json::to_value(&form)?;
        Ok(match id {
            Some(id) => self.update_row(id, body).await,
            None => self.create_row(body).await,
        })
    }

    fn notify_done(&self, action: &str) {
        let mut singular = T::resource_name_singular().to_string();
        if let Some(first) = singular.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        self.notifier
            .notify(Notification::success(format!("{} {}", singular, action)));
    }

    fn notify_failure(&self, action: &str, err: &crate::core::error::WorkdeskError) {
        tracing::warn!(
            resource = T::resource_name(),
            action,
            code = err.error_code(),
            error = %err,
            "mutation failed"
        );
        self.notifier.notify(Notification::error(err.user_message()));
    }

    fn publish(&self, event: CollectionEvent) {
        if let Some(events) = &self.events {
            events.publish(WorkspaceEvent::Collection(event));
        }
    }
}

impl ListView<Task> {
    /// Advance a task to its next status (todo, in progress, done, todo)
    pub async fn toggle_status(&mut self, id: &RecordId) -> bool {
        let Some(task) = self.collection.iter().find(|task| &task.id == id) else {
            return false;
        };
        let next = task.status.next();
        self.update_row(id, json!({ "status": next.key() })).await
    }

    /// Tasks per status, in status order
    pub fn status_counts(&self) -> Vec<(TaskStatus, usize)> {
        TaskStatus::ALL
            .iter()
            .map(|status| {
                let count = self.collection.iter().filter(|t| t.status == *status).count();
                (*status, count)
            })
            .collect()
    }
}

impl<T: ListItem> std::fmt::Debug for ListView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListView")
            .field("resource", &T::resource_name())
            .field("state", &self.state)
            .field("generation", &self.fetcher.generation())
            .field("items", &self.collection.len())
            .finish()
    }
}
