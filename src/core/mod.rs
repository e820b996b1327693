//! Core module containing the domain-independent building blocks

pub mod auth;
pub mod badge;
pub mod editor;
pub mod entity;
pub mod error;
pub mod events;
pub mod field;
pub mod notify;
pub mod query;
pub mod service;
pub mod validation;

pub use auth::{CurrentUser, RouteDecision, RouteGuard, Session, SessionContext, TokenStore};
pub use badge::{Badge, BadgeColor, BadgeIcon, Badged, ClosedEnum};
pub use entity::{ListItem, RecordId};
pub use error::{WorkdeskError, WorkdeskResult};
pub use events::{EventBus, WorkspaceEvent};
pub use field::FieldValue;
pub use notify::{Notification, NotificationCenter, Notifier, TracingNotifier};
pub use query::{Direction, FilterState, PaginationMeta, SortState};
pub use service::{PathParams, RemoteService};
