//! Repository for the `subtasks` and `subtask_assignees` tables.

use std::collections::HashMap;

use labdesk_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::subtask::{AssignedTask, CreateSubTask, SubTask, UpdateSubTask};

const COLUMNS: &str = "id, milestone_id, parent_id, title, description, start_date, due_date, \
                       status, completed, created_at, updated_at";

const S_COLUMNS: &str = "s.id, s.milestone_id, s.parent_id, s.title, s.description, \
                         s.start_date, s.due_date, s.status, s.completed, s.created_at, s.updated_at";

/// Joins shared by per-user task listings.
const ASSIGNED_FROM: &str = "FROM subtasks s
     JOIN subtask_assignees a ON a.subtask_id = s.id
     JOIN milestones m ON m.id = s.milestone_id
     JOIN projects p ON p.id = m.project_id";

/// Provides CRUD operations for subtasks.
pub struct SubTaskRepo;

impl SubTaskRepo {
    /// Insert a subtask and its assignees in one transaction.
    pub async fn create(
        pool: &PgPool,
        milestone_id: DbId,
        input: &CreateSubTask,
    ) -> Result<SubTask, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO subtasks
                (milestone_id, parent_id, title, description, start_date, due_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, SubTask>(&query)
            .bind(milestone_id)
            .bind(input.parent_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(input.status.unwrap_or_default().as_str())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO subtask_assignees (subtask_id, user_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(task.id)
        .bind(&input.assigned_to)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SubTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subtasks WHERE id = $1");
        sqlx::query_as::<_, SubTask>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every subtask of a milestone, ordered by due date (undated last).
    pub async fn list_by_milestone(
        pool: &PgPool,
        milestone_id: DbId,
    ) -> Result<Vec<SubTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subtasks
             WHERE milestone_id = $1
             ORDER BY due_date NULLS LAST, id"
        );
        sqlx::query_as::<_, SubTask>(&query)
            .bind(milestone_id)
            .fetch_all(pool)
            .await
    }

    /// Assignee ids for every subtask of a milestone, keyed by subtask id.
    pub async fn assignees_by_milestone(
        pool: &PgPool,
        milestone_id: DbId,
    ) -> Result<HashMap<DbId, Vec<DbId>>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (DbId, DbId)>(
            "SELECT a.subtask_id, a.user_id
             FROM subtask_assignees a
             JOIN subtasks s ON s.id = a.subtask_id
             WHERE s.milestone_id = $1
             ORDER BY a.subtask_id, a.user_id",
        )
        .bind(milestone_id)
        .fetch_all(pool)
        .await?;

        let mut map: HashMap<DbId, Vec<DbId>> = HashMap::new();
        for (subtask_id, user_id) in rows {
            map.entry(subtask_id).or_default().push(user_id);
        }
        Ok(map)
    }

    /// Update a subtask. Only non-`None` fields in `input` are applied.
    ///
    /// `parent_id` re-parents the task; `make_root` detaches it. The caller
    /// is responsible for rejecting cycles.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubTask,
    ) -> Result<Option<SubTask>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "UPDATE subtasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                due_date = COALESCE($5, due_date),
                status = COALESCE($6, status),
                completed = COALESCE($7, completed),
                parent_id = CASE
                    WHEN $8::BIGINT IS NOT NULL THEN $8
                    WHEN $9 THEN NULL
                    ELSE parent_id
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, SubTask>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.completed)
            .bind(input.parent_id)
            .bind(input.make_root)
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(task), Some(assigned)) = (&task, &input.assigned_to) {
            sqlx::query("DELETE FROM subtask_assignees WHERE subtask_id = $1")
                .bind(task.id)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "INSERT INTO subtask_assignees (subtask_id, user_id)
                 SELECT $1, UNNEST($2::BIGINT[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(task.id)
            .bind(assigned)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(task)
    }

    /// Every task assigned to the user, ordered by due date (undated last).
    pub async fn list_assigned_to(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AssignedTask>, sqlx::Error> {
        let query = format!(
            "SELECT {S_COLUMNS}, m.title AS milestone_title, p.id AS project_id,
                    p.title AS project_title
             {ASSIGNED_FROM}
             WHERE a.user_id = $1
             ORDER BY s.due_date NULLS LAST, s.id"
        );
        sqlx::query_as::<_, AssignedTask>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Tasks assigned to the user, due within `[from, to]` (`to = None` means
    /// unbounded), optionally restricted to the given statuses.
    pub async fn list_assigned_due_between(
        pool: &PgPool,
        user_id: DbId,
        from: Date,
        to: Option<Date>,
        statuses: Option<&[&str]>,
    ) -> Result<Vec<AssignedTask>, sqlx::Error> {
        let query = format!(
            "SELECT {S_COLUMNS}, m.title AS milestone_title, p.id AS project_id,
                    p.title AS project_title
             {ASSIGNED_FROM}
             WHERE a.user_id = $1
               AND s.due_date >= $2
               AND ($3::DATE IS NULL OR s.due_date <= $3)
               AND ($4::TEXT[] IS NULL OR s.status = ANY($4))
             ORDER BY s.due_date, s.id"
        );
        let statuses: Option<Vec<String>> =
            statuses.map(|list| list.iter().map(|s| s.to_string()).collect());
        sqlx::query_as::<_, AssignedTask>(&query)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .bind(statuses)
            .fetch_all(pool)
            .await
    }
}
