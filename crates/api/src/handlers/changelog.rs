//! Handlers for project change logs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labdesk_core::membership::ProjectAccess;
use labdesk_core::records::validate_changelog;
use labdesk_core::types::DbId;
use labdesk_db::models::changelog::{CreateChangeLog, ProjectChangeLog};
use labdesk_db::repositories::ChangeLogRepo;

use crate::access::require_project;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/changelogs
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectChangeLog>>>> {
    require_project(&state, &user, project_id, ProjectAccess::Read).await?;
    let changelogs = ChangeLogRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: changelogs }))
}

/// POST /api/v1/projects/{id}/changelogs
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateChangeLog>,
) -> AppResult<(StatusCode, Json<ProjectChangeLog>)> {
    require_project(&state, &user, project_id, ProjectAccess::Write).await?;
    validate_changelog(&input.title, &input.description)?;

    let changelog = ChangeLogRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(changelog_id = changelog.id, project_id, "Change log recorded");
    Ok((StatusCode::CREATED, Json(changelog)))
}
