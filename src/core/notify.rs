//! Transient user notifications (toasts)
//!
//! Asynchronous failures never propagate past the component that started the
//! request; they end up here instead. A [`Notifier`] is injected wherever a
//! request is made, so the UI decides how toasts are displayed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A single toast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

/// Sink for notifications
///
/// Implementations must not block: notifying happens on the UI path.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Bounded in-memory queue drained by the UI
///
/// When full, the oldest toast is dropped.
#[derive(Debug)]
pub struct NotificationCenter {
    queue: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove and return every pending notification, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        Vec::from(std::mem::take(&mut *self.queue()))
    }

    /// Messages of pending notifications without removing them
    pub fn messages(&self) -> Vec<String> {
        self.queue().iter().map(|n| n.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        let mut queue = self.queue();
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(notification);
    }
}

/// Notifier that only logs, for headless use
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::warn!(text = %notification.message, "notification"),
            _ => tracing::info!(text = %notification.message, "notification"),
        }
    }
}
