//! Row shapes for the per-user dashboard.

use serde::Serialize;
use sqlx::FromRow;

use crate::models::project::Project;

/// A project plus the requesting user's role in it (first membership found).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithRole {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub role: Option<String>,
}
