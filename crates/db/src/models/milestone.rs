//! Milestone entity model and DTOs.

use labdesk_core::status::WorkStatus;
use labdesk_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Milestone with its project's title, for cross-project listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MilestoneWithProject {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub milestone: Milestone,
    pub project_title: String,
}

/// DTO for creating a milestone. `project_id` comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMilestone {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    /// Defaults to `planned` if omitted.
    pub status: Option<WorkStatus>,
    /// Users responsible for the milestone.
    #[serde(default)]
    pub responsible: Vec<DbId>,
}

/// DTO for updating a milestone. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMilestone {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub status: Option<WorkStatus>,
    /// Replaces the responsible set when present.
    pub responsible: Option<Vec<DbId>>,
}
