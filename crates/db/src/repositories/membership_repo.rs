//! Repository for the `project_memberships` table.

use labdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::membership::{CreateMembership, ProjectMember, ProjectMembership};

const COLUMNS: &str = "id, user_id, project_id, role, assigned_at, is_active, note";

const M_COLUMNS: &str = "m.id, m.user_id, m.project_id, m.role, m.assigned_at, m.is_active, m.note";

/// Provides membership lookups and mutations.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Insert a membership row, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMembership,
    ) -> Result<ProjectMembership, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_memberships (user_id, project_id, role, note, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectMembership>(&query)
            .bind(input.user_id)
            .bind(input.project_id)
            .bind(input.role.as_str())
            .bind(&input.note)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectMembership>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_memberships WHERE id = $1");
        sqlx::query_as::<_, ProjectMembership>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every membership row the user holds in a project, oldest first.
    pub async fn list_for_user_in_project(
        pool: &PgPool,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<Vec<ProjectMembership>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_memberships
             WHERE user_id = $1 AND project_id = $2
             ORDER BY id"
        );
        sqlx::query_as::<_, ProjectMembership>(&query)
            .bind(user_id)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Members of a project with usernames, ordered by role then username.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectMember>, sqlx::Error> {
        let query = format!(
            "SELECT {M_COLUMNS}, u.username
             FROM project_memberships m
             JOIN users u ON u.id = m.user_id
             WHERE m.project_id = $1
             ORDER BY m.role, u.username"
        );
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a pending membership approved.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectMembership>, sqlx::Error> {
        let query = format!(
            "UPDATE project_memberships SET is_active = true
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectMembership>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
