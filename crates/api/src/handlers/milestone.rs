//! Handlers for milestones and their subtask trees.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use labdesk_core::error::CoreError;
use labdesk_core::membership::ProjectAccess;
use labdesk_core::records::validate_milestone;
use labdesk_core::task_tree::{TaskBranch, TaskTree};
use labdesk_core::types::DbId;
use labdesk_db::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};
use labdesk_db::models::subtask::SubTaskDetail;
use labdesk_db::repositories::{MilestoneRepo, SubTaskRepo};
use serde::Serialize;

use super::check_users_exist;
use crate::access::require_project;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Milestone with its responsible users and nested subtasks.
#[derive(Debug, Serialize)]
pub struct MilestoneDetail<'a> {
    #[serde(flatten)]
    pub milestone: Milestone,
    pub responsible: Vec<DbId>,
    pub subtasks: Vec<TaskBranch<'a, SubTaskDetail>>,
}

/// GET /api/v1/projects/{id}/milestones
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Milestone>>>> {
    require_project(&state, &user, project_id, ProjectAccess::Read).await?;
    let milestones = MilestoneRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: milestones }))
}

/// POST /api/v1/projects/{id}/milestones
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateMilestone>,
) -> AppResult<(StatusCode, Json<Milestone>)> {
    require_project(&state, &user, project_id, ProjectAccess::Write).await?;

    let mut errors = validate_milestone(&input.title, input.start_date, input.due_date)
        .err()
        .unwrap_or_default();
    check_users_exist(&state.pool, &mut errors, "responsible", &input.responsible).await?;
    errors.into_result()?;

    let milestone = MilestoneRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(milestone_id = milestone.id, project_id, "Milestone created");
    Ok((StatusCode::CREATED, Json(milestone)))
}

/// GET /api/v1/milestones/{id}
///
/// Subtasks are rendered as a tree rooted at tasks without a parent.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let milestone = find_milestone(&state, id).await?;
    require_project(&state, &user, milestone.project_id, ProjectAccess::Read).await?;

    let responsible = MilestoneRepo::responsible_ids(&state.pool, id).await?;
    let mut assignees = SubTaskRepo::assignees_by_milestone(&state.pool, id).await?;
    let details: Vec<SubTaskDetail> = SubTaskRepo::list_by_milestone(&state.pool, id)
        .await?
        .into_iter()
        .map(|task| SubTaskDetail {
            assigned_to: assignees.remove(&task.id).unwrap_or_default(),
            task,
        })
        .collect();
    let tree = TaskTree::build(details);

    let detail = MilestoneDetail {
        milestone,
        responsible,
        subtasks: tree.nested(),
    };
    Ok(Json(detail).into_response())
}

/// PUT /api/v1/milestones/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMilestone>,
) -> AppResult<Json<Milestone>> {
    let current = find_milestone(&state, id).await?;
    require_project(&state, &user, current.project_id, ProjectAccess::Write).await?;

    let mut errors = validate_milestone(
        input.title.as_deref().unwrap_or(&current.title),
        input.start_date.or(current.start_date),
        input.due_date.or(current.due_date),
    )
    .err()
    .unwrap_or_default();
    if let Some(responsible) = &input.responsible {
        check_users_exist(&state.pool, &mut errors, "responsible", responsible).await?;
    }
    errors.into_result()?;

    let milestone = MilestoneRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))?;
    Ok(Json(milestone))
}

pub(crate) async fn find_milestone(state: &AppState, id: DbId) -> AppResult<Milestone> {
    MilestoneRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))
}

