//! # Workdesk
//!
//! Client library for the company task and project management CMS.
//!
//! ## Features
//!
//! - **Remote collections**: load task, employee, project and announcement
//!   lists from the REST backend, discarding results of superseded loads
//! - **Local filter/sort**: stable search, enum and relation filters with
//!   ascending/descending column sorting, computed on the client
//! - **Presentation**: table and pie chart models rendered from list views
//! - **Forms**: validated and normalized create/edit payloads
//! - **Session**: token persistence, current user and route guarding
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use workdesk::prelude::*;
//!
//! let config = WorkdeskConfig::from_yaml_file("workdesk.yaml")?;
//! let client = ApiClient::new(&config, SessionContext::default())?;
//!
//! let mut tasks = ListView::new(
//!     Arc::new(RestService::<Task>::new(client)),
//!     Arc::new(TracingNotifier),
//! );
//! tasks.refresh().await;
//! tasks.set_enum_filter("status", "done");
//! tasks.toggle_sort("due_date");
//!
//! print!("{}", TableModel::build(&tasks).render_text());
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod entities;
pub mod list;
pub mod view;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{
            CurrentUser, FileTokenStore, MemoryTokenStore, RouteDecision, RouteGuard, Session,
            SessionContext, TokenStore,
        },
        badge::{
            AnnouncementCategory, Badge, BadgeColor, Badged, ClosedEnum, EmployeeRole,
            EmployeeStatus, Priority, ProjectStatus, TaskStatus,
        },
        entity::{ListItem, RecordId},
        error::{ApiError, WorkdeskError, WorkdeskResult},
        events::{CollectionEvent, EventBus, SessionEvent, WorkspaceEvent},
        notify::{Notification, NotificationCenter, Notifier, TracingNotifier},
        query::{Direction, FilterState, PaginationMeta, SortState},
        service::{PathParams, RemoteService},
        validation::{
            AnnouncementForm, EmployeeForm, LoginForm, ProjectForm, SettingsForm, TaskForm,
        },
    };

    // === Records ===
    pub use crate::entities::{Announcement, CompanySettings, Employee, Project, Relation, Task};

    // === Client ===
    pub use crate::client::{ApiClient, auth::AuthFlow, endpoint::Endpoint, rest::RestService};

    // === Lists and presentation ===
    pub use crate::list::{ListPresentation, ListView, LoadState};
    pub use crate::view::{PieChart, TableModel, TableRow};

    // === Config ===
    pub use crate::config::WorkdeskConfig;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
