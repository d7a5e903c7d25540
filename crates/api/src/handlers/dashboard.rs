//! Handler for the per-user dashboard.

use axum::extract::State;
use axum::Json;
use labdesk_core::dashboard::{
    upcoming_task_window, DASHBOARD_CHANGELOG_LIMIT, DASHBOARD_DOCUMENT_LIMIT,
    DASHBOARD_MILESTONE_LIMIT, DASHBOARD_PROJECT_LIMIT, OPEN_TASK_STATUSES,
};
use labdesk_db::models::changelog::ChangeLogWithProject;
use labdesk_db::models::dashboard::ProjectWithRole;
use labdesk_db::models::document::DocumentWithProject;
use labdesk_db::models::milestone::MilestoneWithProject;
use labdesk_db::models::subtask::AssignedTask;
use labdesk_db::repositories::{
    ChangeLogRepo, DashboardRepo, DocumentRepo, MilestoneRepo, ProjectRepo, SubTaskRepo,
};
use serde::Serialize;

use super::today;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Dashboard widgets for one user.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub active_project_count: i64,
    pub projects: Vec<ProjectWithRole>,
    pub recent_documents: Vec<DocumentWithProject>,
    pub upcoming_milestones: Vec<MilestoneWithProject>,
    pub upcoming_tasks: Vec<AssignedTask>,
    pub recent_changelogs: Vec<ChangeLogWithProject>,
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let pool = &state.pool;
    let user_id = user.user_id;
    let today = today();
    let (from, to) = upcoming_task_window(today);

    let dashboard = Dashboard {
        active_project_count: DashboardRepo::count_active_projects(pool, user_id).await?,
        projects: ProjectRepo::list_with_role_for_user(
            pool,
            user_id,
            true,
            Some(DASHBOARD_PROJECT_LIMIT),
        )
        .await?,
        recent_documents: DocumentRepo::list_recent_for_user(
            pool,
            user_id,
            DASHBOARD_DOCUMENT_LIMIT,
        )
        .await?,
        upcoming_milestones: MilestoneRepo::list_upcoming_for_user(
            pool,
            user_id,
            today,
            Some(DASHBOARD_MILESTONE_LIMIT),
        )
        .await?,
        upcoming_tasks: SubTaskRepo::list_assigned_due_between(
            pool,
            user_id,
            from,
            Some(to),
            Some(OPEN_TASK_STATUSES),
        )
        .await?,
        recent_changelogs: ChangeLogRepo::list_for_user(
            pool,
            user_id,
            Some(DASHBOARD_CHANGELOG_LIMIT),
        )
        .await?,
    };

    Ok(Json(DataResponse { data: dashboard }))
}
