//! Handlers for the `/projects` resource.
//!
//! Create and edit run the full project check ([`ProjectFields::clean`]):
//! per-field rules plus the cross-field consistency rules. Failures come back
//! as a 400 with every rejected field and its messages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labdesk_core::error::CoreError;
use labdesk_core::field_errors::FieldErrors;
use labdesk_core::membership::{initial_memberships, lead_memberships, ProjectAccess};
use labdesk_core::project::{DaysRemaining, ProjectFields, ProjectRecord, ProjectStatus};
use labdesk_core::types::DbId;
use labdesk_db::models::milestone::Milestone;
use labdesk_db::models::project::Project;
use labdesk_db::repositories::{MilestoneRepo, ProjectRepo};
use serde::Serialize;

use super::{check_users_exist, today};
use crate::access::require_project;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// A project with its schedule position on the current day.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    pub display_name: String,
    pub status: ProjectStatus,
    pub status_label: &'static str,
    pub days_remaining: DaysRemaining,
}

impl ProjectSummary {
    pub fn new(project: Project) -> Self {
        let today = today();
        let status = project.status(today);
        Self {
            display_name: project.display_name(),
            status,
            status_label: status.label(),
            days_remaining: project.days_remaining(today),
            project,
        }
    }
}

/// Project detail page payload.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub summary: ProjectSummary,
    pub milestones: Vec<Milestone>,
}

/// GET /api/v1/projects
///
/// Projects the caller belongs to, pending memberships included.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let projects = ProjectRepo::list_for_user(&state.pool, user.user_id).await?;
    let data = projects.into_iter().map(ProjectSummary::new).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/projects/joinable
pub async fn list_joinable(
    State(state): State<AppState>,
    _auth: RequireAuth,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let projects = ProjectRepo::list_active(&state.pool).await?;
    let data = projects.into_iter().map(ProjectSummary::new).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/projects
///
/// The principal investigator, the steward and (if neither) the creator are
/// enrolled with approved memberships.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ProjectFields>,
) -> AppResult<(StatusCode, Json<ProjectSummary>)> {
    let record = clean_project(&state, &input).await?;

    let memberships = initial_memberships(
        user.user_id,
        record.principal_investigator_id,
        record.project_support_id,
    );
    let project =
        ProjectRepo::create_with_memberships(&state.pool, &record, user.user_id, &memberships)
            .await?;
    tracing::info!(
        project_id = project.id,
        internal_number = %project.internal_number,
        created_by = user.user_id,
        "Project created"
    );

    Ok((StatusCode::CREATED, Json(ProjectSummary::new(project))))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let project = require_project(&state, &user, id, ProjectAccess::Read).await?;
    let milestones = MilestoneRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(ProjectDetail {
        summary: ProjectSummary::new(project),
        milestones,
    }))
}

/// PUT /api/v1/projects/{id}
///
/// Full replacement of the editable fields; the same checks as create apply.
/// A newly named principal investigator or steward is enrolled with an
/// approved membership.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ProjectFields>,
) -> AppResult<Json<ProjectSummary>> {
    require_project(&state, &user, id, ProjectAccess::Manage).await?;
    let record = clean_project(&state, &input).await?;

    let leads = lead_memberships(record.principal_investigator_id, record.project_support_id);
    let project = ProjectRepo::update(&state.pool, id, &record, &leads)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    tracing::info!(project_id = id, updated_by = user.user_id, "Project updated");
    Ok(Json(ProjectSummary::new(project)))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(project_id = id, deleted_by = admin.user_id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

/// Run every project check, then confirm the referenced users exist.
async fn clean_project(state: &AppState, input: &ProjectFields) -> AppResult<ProjectRecord> {
    let record = input.clean()?;

    let mut errors = FieldErrors::new();
    check_users_exist(
        &state.pool,
        &mut errors,
        "principal_investigator_id",
        &[record.principal_investigator_id],
    )
    .await?;
    check_users_exist(
        &state.pool,
        &mut errors,
        "project_support_id",
        &[record.project_support_id],
    )
    .await?;
    errors.into_result()?;

    Ok(record)
}
