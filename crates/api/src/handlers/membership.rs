//! Handlers for joining projects and managing membership requests.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labdesk_core::error::CoreError;
use labdesk_core::field_errors::FieldErrors;
use labdesk_core::membership::{validate_note, ProjectAccess};
use labdesk_core::types::DbId;
use labdesk_db::models::membership::{
    CreateMembership, JoinProject, ProjectMember, ProjectMembership,
};
use labdesk_db::repositories::{MembershipRepo, ProjectRepo};

use crate::access::require_project;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/join
///
/// Files a pending membership request. If the caller already holds any
/// membership in the project, that membership is returned unchanged.
pub async fn join(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<JoinProject>,
) -> AppResult<(StatusCode, Json<ProjectMembership>)> {
    if let Err(msg) = validate_note(&input.note) {
        return Err(FieldErrors::single("note", msg).into());
    }

    let project = ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }))?;
    if !project.is_active {
        return Err(FieldErrors::single("project_id", "This project is not accepting members.").into());
    }

    let existing =
        MembershipRepo::list_for_user_in_project(&state.pool, user.user_id, project.id).await?;
    if let Some(membership) = existing.into_iter().next() {
        return Ok((StatusCode::OK, Json(membership)));
    }

    let membership = MembershipRepo::create(
        &state.pool,
        &CreateMembership {
            user_id: user.user_id,
            project_id: project.id,
            role: input.role,
            note: input.note.trim().to_string(),
            is_active: false,
        },
    )
    .await?;
    tracing::info!(
        user_id = user.user_id,
        project_id = project.id,
        role = input.role.as_str(),
        "Join request filed"
    );

    Ok((StatusCode::CREATED, Json(membership)))
}

/// GET /api/v1/projects/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectMember>>>> {
    require_project(&state, &user, project_id, ProjectAccess::Read).await?;
    let members = MembershipRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/projects/{id}/members/{membership_id}/approve
pub async fn approve(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, membership_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<ProjectMembership>> {
    require_project(&state, &user, project_id, ProjectAccess::Manage).await?;

    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Membership",
            id: membership_id,
        })
    };
    let membership = MembershipRepo::find_by_id(&state.pool, membership_id)
        .await?
        .filter(|m| m.project_id == project_id)
        .ok_or_else(not_found)?;

    let approved = MembershipRepo::approve(&state.pool, membership.id)
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(
        membership_id,
        project_id,
        approved_by = user.user_id,
        "Membership approved"
    );
    Ok(Json(approved))
}
