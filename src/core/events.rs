//! Internal event bus for UI-wide notifications
//!
//! List views, mutations and the session publish to the [`EventBus`]; any
//! number of UI surfaces (toast area, status bar, logs) subscribe. It uses
//! `tokio::sync::broadcast`, so a slow subscriber only lags itself.
//!
//! ```text
//! ListView ──────┐
//! RowMutations ──┼──▶ EventBus::publish() ──▶ broadcast channel ──▶ toast area
//! AuthFlow ──────┘                                              ──▶ status bar
//! ```

use crate::core::notify::{Notification, Notifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events about a list view's collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CollectionEvent {
    /// A load completed and replaced the whole collection
    Replaced {
        resource: String,
        generation: u64,
        count: usize,
    },
    /// A load failed; the previous collection is still shown
    LoadFailed {
        resource: String,
        generation: u64,
        message: String,
    },
    /// A single row changed after the backend confirmed a mutation
    RowUpdated { resource: String, id: String },
    /// A row was removed after the backend confirmed the deletion
    RowDeleted { resource: String, id: String },
}

/// Events about the authentication session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionEvent {
    LoggedIn { user_id: String },
    LoggedOut,
}

/// Top-level event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkspaceEvent {
    Notification(Notification),
    Collection(CollectionEvent),
    Session(SessionEvent),
}

impl WorkspaceEvent {
    pub fn event_kind(&self) -> &str {
        match self {
            WorkspaceEvent::Notification(_) => "notification",
            WorkspaceEvent::Collection(_) => "collection",
            WorkspaceEvent::Session(_) => "session",
        }
    }

    /// Resource name for collection events
    pub fn resource(&self) -> Option<&str> {
        match self {
            WorkspaceEvent::Collection(
                CollectionEvent::Replaced { resource, .. }
                | CollectionEvent::LoadFailed { resource, .. }
                | CollectionEvent::RowUpdated { resource, .. }
                | CollectionEvent::RowDeleted { resource, .. },
            ) => Some(resource.as_str()),
            _ => None,
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: WorkspaceEvent,
}

impl EventEnvelope {
    pub fn new(event: WorkspaceEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; every clone publishes to the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of receivers that will receive the event.
    pub fn publish(&self, event: WorkspaceEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() returns Err only if there are no receivers, which is fine
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Notifier for EventBus {
    fn notify(&self, notification: Notification) {
        self.publish(WorkspaceEvent::Notification(notification));
    }
}
