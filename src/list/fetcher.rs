//! Remote collection fetcher
//!
//! Each load is tagged with a monotonically increasing generation. Starting a
//! new load aborts the previous background task, and any result that still
//! arrives for an older generation is reported as stale so the caller can
//! drop it.
//!
//! ```text
//! begin() ── gen 1 ──▶ spawn ──X (aborted)
//! begin() ── gen 2 ──▶ spawn ──▶ channel ──▶ next_completed() ──▶ (2, Ok(items))
//! ```

use crate::core::entity::ListItem;
use crate::core::error::WorkdeskResult;
use crate::core::service::{PathParams, RemoteService};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Outcome of one load, tagged with its generation
pub type Completed<T> = (u64, WorkdeskResult<Vec<T>>);

/// A load that has been started but not yet run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: u64,
    pub path: String,
}

pub struct CollectionFetcher<T: ListItem> {
    service: Arc<dyn RemoteService<T>>,
    params: PathParams,
    generation: u64,
    sender: mpsc::UnboundedSender<Completed<T>>,
    receiver: mpsc::UnboundedReceiver<Completed<T>>,
    in_flight: Option<JoinHandle<()>>,
}

impl<T: ListItem> CollectionFetcher<T> {
    pub fn new(service: Arc<dyn RemoteService<T>>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            service,
            params: PathParams::new(),
            generation: 0,
            sender,
            receiver,
            in_flight: None,
        }
    }

    pub fn service(&self) -> &Arc<dyn RemoteService<T>> {
        &self.service
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Set a parameter, returning whether its value changed
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        let value = value.into();
        if self.params.get(&name) == Some(&value) {
            return false;
        }
        self.params.insert(name, value);
        true
    }

    pub fn remove_param(&mut self, name: &str) -> bool {
        self.params.shift_remove(name).is_some()
    }

    /// Generation of the most recent load
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start a new load, superseding any previous one
    ///
    /// Returns `None` when a required parameter is missing; the generation
    /// still advances so results of earlier loads are treated as stale.
    pub fn begin(&mut self) -> Option<LoadRequest> {
        self.cancel();
        self.generation += 1;
        let path = self.service.collection_path(&self.params)?;
        Some(LoadRequest {
            generation: self.generation,
            path,
        })
    }

    /// Run a load on the current task
    pub async fn run(&self, request: &LoadRequest) -> WorkdeskResult<Vec<T>> {
        tracing::debug!(
            resource = T::resource_name(),
            generation = request.generation,
            path = %request.path,
            "fetching collection"
        );
        self.service.list(&request.path).await
    }

    /// Run a load in the background; the result arrives through
    /// [`next_completed`](Self::next_completed) or [`try_completed`](Self::try_completed)
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(&mut self, request: LoadRequest) {
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        tracing::debug!(
            resource = T::resource_name(),
            generation = request.generation,
            path = %request.path,
            "fetching collection in background"
        );
        self.in_flight = Some(tokio::spawn(async move {
            let result = service.list(&request.path).await;
            let _ = sender.send((request.generation, result));
        }));
    }

    /// Abort the background load, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                tracing::debug!(resource = T::resource_name(), generation = self.generation, "aborting superseded load");
            }
            handle.abort();
        }
    }

    /// Completed background loads, without waiting
    pub fn try_completed(&mut self) -> Vec<Completed<T>> {
        let mut done = Vec::new();
        while let Ok(completed) = self.receiver.try_recv() {
            done.push(completed);
        }
        done
    }

    /// Wait for the next completed background load
    ///
    /// Returns `None` when nothing is pending.
    pub async fn next_completed(&mut self) -> Option<Completed<T>> {
        if let Ok(completed) = self.receiver.try_recv() {
            return Some(completed);
        }
        let handle = self.in_flight.as_mut()?;
        // an aborted task never sends
        tokio::select! {
            completed = self.receiver.recv() => return completed,
            _ = handle => {}
        }
        self.in_flight = None;
        self.receiver.try_recv().ok()
    }
}

impl<T: ListItem> Drop for CollectionFetcher<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
