//! Repository for the `projects` table.

use labdesk_core::membership::ProjectRole;
use labdesk_core::project::ProjectRecord;
use labdesk_core::types::DbId;
use sqlx::PgPool;

use super::USER_PROJECT_IDS;
use crate::models::dashboard::ProjectWithRole;
use crate::models::project::Project;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, is_active, internal_number, title, description, \
    principal_investigator_id, pi_email, pi_phone, contact_person, contact_email, contact_phone, \
    project_type, project_leader, domestic_partners, foreign_partners, funding_agency, call_name, \
    funding_decision_date, funding_number, agreement_number, agreement_sign_date, start_date, \
    end_date, executing_unit, budget_total, project_support_id, created_by, created_at, updated_at";

/// [`COLUMNS`] qualified with the `p.` alias, for joins.
pub(crate) const P_COLUMNS: &str = "p.id, p.is_active, p.internal_number, p.title, p.description, \
    p.principal_investigator_id, p.pi_email, p.pi_phone, p.contact_person, p.contact_email, \
    p.contact_phone, p.project_type, p.project_leader, p.domestic_partners, p.foreign_partners, \
    p.funding_agency, p.call_name, p.funding_decision_date, p.funding_number, p.agreement_number, \
    p.agreement_sign_date, p.start_date, p.end_date, p.executing_unit, p.budget_total, \
    p.project_support_id, p.created_by, p.created_at, p.updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a validated project and its initial memberships in one transaction.
    pub async fn create_with_memberships(
        pool: &PgPool,
        record: &ProjectRecord,
        created_by: DbId,
        memberships: &[(DbId, ProjectRole)],
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (
                is_active, internal_number, title, description,
                principal_investigator_id, pi_email, pi_phone,
                contact_person, contact_email, contact_phone,
                project_type, project_leader, domestic_partners, foreign_partners,
                funding_agency, call_name, funding_decision_date, funding_number,
                agreement_number, agreement_sign_date, start_date, end_date,
                executing_unit, budget_total, project_support_id, created_by
             ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26
             )
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(record.is_active)
            .bind(&record.internal_number)
            .bind(&record.title)
            .bind(&record.description)
            .bind(record.principal_investigator_id)
            .bind(&record.pi_email)
            .bind(&record.pi_phone)
            .bind(&record.contact_person)
            .bind(&record.contact_email)
            .bind(&record.contact_phone)
            .bind(record.project_type.as_str())
            .bind(&record.project_leader)
            .bind(&record.domestic_partners)
            .bind(&record.foreign_partners)
            .bind(&record.funding_agency)
            .bind(&record.call_name)
            .bind(record.funding_decision_date)
            .bind(&record.funding_number)
            .bind(&record.agreement_number)
            .bind(record.agreement_sign_date)
            .bind(record.start_date)
            .bind(record.end_date)
            .bind(&record.executing_unit)
            .bind(record.budget_total)
            .bind(record.project_support_id)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        grant_memberships(&mut tx, project.id, memberships).await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Projects the user belongs to (any membership), ordered by start date.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE id IN ({USER_PROJECT_IDS})
             ORDER BY start_date, id"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The user's projects, each with their first membership role, ending soonest first.
    ///
    /// `limit = None` returns every match.
    pub async fn list_with_role_for_user(
        pool: &PgPool,
        user_id: DbId,
        active_only: bool,
        limit: Option<i64>,
    ) -> Result<Vec<ProjectWithRole>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS},
                    (SELECT m.role FROM project_memberships m
                     WHERE m.project_id = p.id AND m.user_id = $1
                     ORDER BY m.id LIMIT 1) AS role
             FROM projects p
             WHERE p.id IN ({USER_PROJECT_IDS})
               AND (p.is_active OR NOT $2)
             ORDER BY p.end_date, p.id
             LIMIT $3"
        );
        sqlx::query_as::<_, ProjectWithRole>(&query)
            .bind(user_id)
            .bind(active_only)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Active projects open to join requests, ordered by start date.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE is_active = true ORDER BY start_date, id"
        );
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Replace every editable field with a validated record and grant the
    /// given approved memberships in the same transaction.
    ///
    /// Memberships are only granted when the project exists. Returns `None`
    /// if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        record: &ProjectRecord,
        memberships: &[(DbId, ProjectRole)],
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET
                is_active = $2, internal_number = $3, title = $4, description = $5,
                principal_investigator_id = $6, pi_email = $7, pi_phone = $8,
                contact_person = $9, contact_email = $10, contact_phone = $11,
                project_type = $12, project_leader = $13, domestic_partners = $14,
                foreign_partners = $15, funding_agency = $16, call_name = $17,
                funding_decision_date = $18, funding_number = $19, agreement_number = $20,
                agreement_sign_date = $21, start_date = $22, end_date = $23,
                executing_unit = $24, budget_total = $25, project_support_id = $26
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(record.is_active)
            .bind(&record.internal_number)
            .bind(&record.title)
            .bind(&record.description)
            .bind(record.principal_investigator_id)
            .bind(&record.pi_email)
            .bind(&record.pi_phone)
            .bind(&record.contact_person)
            .bind(&record.contact_email)
            .bind(&record.contact_phone)
            .bind(record.project_type.as_str())
            .bind(&record.project_leader)
            .bind(&record.domestic_partners)
            .bind(&record.foreign_partners)
            .bind(&record.funding_agency)
            .bind(&record.call_name)
            .bind(record.funding_decision_date)
            .bind(&record.funding_number)
            .bind(&record.agreement_number)
            .bind(record.agreement_sign_date)
            .bind(record.start_date)
            .bind(record.end_date)
            .bind(&record.executing_unit)
            .bind(record.budget_total)
            .bind(record.project_support_id)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(project) = &project {
            grant_memberships(&mut tx, project.id, memberships).await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    /// Permanently delete a project and, by cascade, every dependent record.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Insert approved memberships, skipping rows that already exist.
///
/// A pending membership with the same role is approved.
async fn grant_memberships(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    project_id: DbId,
    memberships: &[(DbId, ProjectRole)],
) -> Result<(), sqlx::Error> {
    for (user_id, role) in memberships {
        sqlx::query(
            "INSERT INTO project_memberships (user_id, project_id, role, is_active)
             VALUES ($1, $2, $3, true)
             ON CONFLICT ON CONSTRAINT uq_project_memberships_project_role_user
             DO UPDATE SET is_active = true",
        )
        .bind(user_id)
        .bind(project_id)
        .bind(role.as_str())
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
