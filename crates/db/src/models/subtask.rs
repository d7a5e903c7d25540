//! Subtask entity model and DTOs.

use labdesk_core::status::WorkStatus;
use labdesk_core::task_tree::TreeItem;
use labdesk_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `subtasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubTask {
    pub id: DbId,
    pub milestone_id: DbId,
    pub parent_id: Option<DbId>,
    pub title: String,
    pub description: String,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub status: String,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TreeItem for SubTask {
    fn id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }
}

/// Subtask with its milestone and project, for per-user task lists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignedTask {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: SubTask,
    pub milestone_title: String,
    pub project_id: DbId,
    pub project_title: String,
}

/// Subtask plus the ids of its assignees, as rendered in a milestone tree.
#[derive(Debug, Clone, Serialize)]
pub struct SubTaskDetail {
    #[serde(flatten)]
    pub task: SubTask,
    pub assigned_to: Vec<DbId>,
}

impl TreeItem for SubTaskDetail {
    fn id(&self) -> DbId {
        self.task.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.task.parent_id
    }
}

/// DTO for creating a subtask. `milestone_id` comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub parent_id: Option<DbId>,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub status: Option<WorkStatus>,
    #[serde(default)]
    pub assigned_to: Vec<DbId>,
}

/// DTO for updating a subtask. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub status: Option<WorkStatus>,
    pub completed: Option<bool>,
    /// New parent within the same milestone.
    pub parent_id: Option<DbId>,
    /// Detach from the current parent (ignored when `parent_id` is set).
    #[serde(default)]
    pub make_root: bool,
    /// Replaces the assignee set when present.
    pub assigned_to: Option<Vec<DbId>>,
}
