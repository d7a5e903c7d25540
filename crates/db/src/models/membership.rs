//! Project membership model and DTOs.

use labdesk_core::membership::{MemberStanding, ProjectRole};
use labdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_memberships` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMembership {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    /// `PI`, `PS`, `CO` or `AD`.
    pub role: String,
    pub assigned_at: Timestamp,
    pub is_active: bool,
    pub note: String,
}

impl ProjectMembership {
    /// Reduce to the shape access checks need. Unknown role codes are skipped.
    pub fn standing(&self) -> Option<MemberStanding> {
        ProjectRole::from_str_value(&self.role)
            .ok()
            .map(|role| MemberStanding {
                role,
                is_active: self.is_active,
            })
    }
}

/// Membership joined with the member's username, for project member lists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub membership: ProjectMembership,
    pub username: String,
}

/// DTO for inserting a membership row.
#[derive(Debug, Clone)]
pub struct CreateMembership {
    pub user_id: DbId,
    pub project_id: DbId,
    pub role: ProjectRole,
    pub note: String,
    pub is_active: bool,
}

/// Request body for joining a project.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinProject {
    pub project_id: DbId,
    pub role: ProjectRole,
    #[serde(default)]
    pub note: String,
}
