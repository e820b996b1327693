//! Records exchanged with the CMS backend
//!
//! The backend speaks camelCase JSON with document ids under `_id`; every
//! record accepts both `_id` and `id`.

pub mod announcement;
pub mod employee;
pub mod macros;
pub mod project;
pub mod settings;
pub mod task;

pub use announcement::Announcement;
pub use employee::Employee;
pub use project::Project;
pub use settings::CompanySettings;
pub use task::Task;

use crate::core::entity::RecordId;
use serde::{Deserialize, Deserializer, Serialize};

/// Reference to another record
///
/// Depending on the endpoint the backend either sends a bare id or a
/// populated object such as `{"_id": "...", "name": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Relation {
    pub fn id(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn named(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    /// Name if populated, id otherwise
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelationRepr {
    Id(RecordId),
    Populated {
        #[serde(alias = "_id")]
        id: RecordId,
        #[serde(default, alias = "fullName", alias = "title")]
        name: Option<String>,
    },
}

impl<'de> Deserialize<'de> for Relation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RelationRepr::deserialize(deserializer)? {
            RelationRepr::Id(id) => Relation { id, name: None },
            RelationRepr::Populated { id, name } => Relation { id, name },
        })
    }
}
