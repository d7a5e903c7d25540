//! Project change log model and DTOs.

use labdesk_core::status::ChangeLogStatus;
use labdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_change_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectChangeLog {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// Change log entry with its project's title.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChangeLogWithProject {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub changelog: ProjectChangeLog,
    pub project_title: String,
}

/// DTO for creating a change log entry. `project_id` comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChangeLog {
    pub title: String,
    pub description: String,
    /// Defaults to `draft` if omitted.
    pub status: Option<ChangeLogStatus>,
}
