//! Personal views for the authenticated user.

use axum::extract::State;
use axum::Json;
use labdesk_db::models::changelog::ChangeLogWithProject;
use labdesk_db::models::dashboard::ProjectWithRole;
use labdesk_db::models::milestone::MilestoneWithProject;
use labdesk_db::models::subtask::AssignedTask;
use labdesk_db::repositories::{ChangeLogRepo, MilestoneRepo, ProjectRepo, SubTaskRepo};
use serde::Serialize;

use super::today;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Everything due from today onwards.
#[derive(Debug, Serialize)]
pub struct Calendar {
    pub milestones: Vec<MilestoneWithProject>,
    pub tasks: Vec<AssignedTask>,
}

/// GET /api/v1/me/projects
///
/// Every project the caller belongs to with their role, ending soonest first.
pub async fn projects(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProjectWithRole>>>> {
    let projects =
        ProjectRepo::list_with_role_for_user(&state.pool, user.user_id, false, None).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/me/tasks
pub async fn tasks(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<AssignedTask>>>> {
    let tasks = SubTaskRepo::list_assigned_to(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/me/changelogs
pub async fn changelogs(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ChangeLogWithProject>>>> {
    let changelogs = ChangeLogRepo::list_for_user(&state.pool, user.user_id, None).await?;
    Ok(Json(DataResponse { data: changelogs }))
}

/// GET /api/v1/me/calendar
pub async fn calendar(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Calendar>>> {
    let today = today();
    let milestones =
        MilestoneRepo::list_upcoming_for_user(&state.pool, user.user_id, today, None).await?;
    let tasks =
        SubTaskRepo::list_assigned_due_between(&state.pool, user.user_id, today, None, None)
            .await?;
    Ok(Json(DataResponse {
        data: Calendar { milestones, tasks },
    }))
}
