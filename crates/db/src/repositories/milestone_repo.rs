//! Repository for the `milestones` and `milestone_responsible` tables.

use labdesk_core::types::{Date, DbId};
use sqlx::PgPool;

use super::USER_PROJECT_IDS;
use crate::models::milestone::{CreateMilestone, Milestone, MilestoneWithProject, UpdateMilestone};

const COLUMNS: &str =
    "id, project_id, title, description, start_date, due_date, status, created_at, updated_at";

const M_COLUMNS: &str = "m.id, m.project_id, m.title, m.description, m.start_date, m.due_date, \
                         m.status, m.created_at, m.updated_at";

/// Provides CRUD operations for milestones.
pub struct MilestoneRepo;

impl MilestoneRepo {
    /// Insert a milestone and its responsible users in one transaction.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateMilestone,
    ) -> Result<Milestone, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO milestones (project_id, title, description, start_date, due_date, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let milestone = sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(input.status.unwrap_or_default().as_str())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO milestone_responsible (milestone_id, user_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(milestone.id)
        .bind(&input.responsible)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(milestone)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones WHERE id = $1");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Milestones of a project ordered by due date (undated last).
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestones
             WHERE project_id = $1
             ORDER BY due_date NULLS LAST, id"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Ids of users responsible for a milestone.
    pub async fn responsible_ids(pool: &PgPool, milestone_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT user_id FROM milestone_responsible WHERE milestone_id = $1 ORDER BY user_id",
        )
        .bind(milestone_id)
        .fetch_all(pool)
        .await
    }

    /// Update a milestone. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMilestone,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "UPDATE milestones SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                due_date = COALESCE($5, due_date),
                status = COALESCE($6, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let milestone = sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(milestone), Some(responsible)) = (&milestone, &input.responsible) {
            sqlx::query("DELETE FROM milestone_responsible WHERE milestone_id = $1")
                .bind(milestone.id)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "INSERT INTO milestone_responsible (milestone_id, user_id)
                 SELECT $1, UNNEST($2::BIGINT[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(milestone.id)
            .bind(responsible)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(milestone)
    }

    /// Milestones due on or after `today` across the user's projects.
    ///
    /// `limit = None` returns every match.
    pub async fn list_upcoming_for_user(
        pool: &PgPool,
        user_id: DbId,
        today: Date,
        limit: Option<i64>,
    ) -> Result<Vec<MilestoneWithProject>, sqlx::Error> {
        let query = format!(
            "SELECT {M_COLUMNS}, p.title AS project_title
             FROM milestones m
             JOIN projects p ON p.id = m.project_id
             WHERE m.project_id IN ({USER_PROJECT_IDS})
               AND m.due_date >= $2
             ORDER BY m.due_date, m.id
             LIMIT $3"
        );
        sqlx::query_as::<_, MilestoneWithProject>(&query)
            .bind(user_id)
            .bind(today)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
