//! Repository for the `project_change_logs` table.

use labdesk_core::types::DbId;
use sqlx::PgPool;

use super::USER_PROJECT_IDS;
use crate::models::changelog::{ChangeLogWithProject, CreateChangeLog, ProjectChangeLog};

const COLUMNS: &str = "id, project_id, title, description, status, created_at";

const C_COLUMNS: &str = "c.id, c.project_id, c.title, c.description, c.status, c.created_at";

/// Provides CRUD operations for project change logs.
pub struct ChangeLogRepo;

impl ChangeLogRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateChangeLog,
    ) -> Result<ProjectChangeLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_change_logs (project_id, title, description, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectChangeLog>(&query)
            .bind(project_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.status.unwrap_or_default().as_str())
            .fetch_one(pool)
            .await
    }

    /// Change logs of a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectChangeLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_change_logs
             WHERE project_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ProjectChangeLog>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Change logs across the user's projects, newest first.
    ///
    /// `limit = None` returns every match.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<ChangeLogWithProject>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS}, p.title AS project_title
             FROM project_change_logs c
             JOIN projects p ON p.id = c.project_id
             WHERE c.project_id IN ({USER_PROJECT_IDS})
             ORDER BY c.created_at DESC, c.id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, ChangeLogWithProject>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
