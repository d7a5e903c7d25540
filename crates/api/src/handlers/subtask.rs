//! Handlers for subtasks.
//!
//! A subtask's parent must sit in the same milestone, and re-parenting must
//! not place a task beneath itself or one of its descendants.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labdesk_core::error::CoreError;
use labdesk_core::field_errors::FieldErrors;
use labdesk_core::membership::ProjectAccess;
use labdesk_core::records::validate_subtask;
use labdesk_core::task_tree::TaskTree;
use labdesk_core::types::DbId;
use labdesk_db::models::subtask::{CreateSubTask, SubTask, UpdateSubTask};
use labdesk_db::repositories::SubTaskRepo;

use super::check_users_exist;
use super::milestone::find_milestone;
use crate::access::require_project;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const PARENT_OUTSIDE_MILESTONE: &str = "The parent task must belong to the same milestone.";

/// POST /api/v1/milestones/{id}/subtasks
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(milestone_id): Path<DbId>,
    Json(input): Json<CreateSubTask>,
) -> AppResult<(StatusCode, Json<SubTask>)> {
    let milestone = find_milestone(&state, milestone_id).await?;
    require_project(&state, &user, milestone.project_id, ProjectAccess::Write).await?;

    let mut errors = validate_subtask(&input.title, input.start_date, input.due_date)
        .err()
        .unwrap_or_default();
    if let Some(parent_id) = input.parent_id {
        let parent = SubTaskRepo::find_by_id(&state.pool, parent_id).await?;
        if !matches!(parent, Some(p) if p.milestone_id == milestone_id) {
            errors.add("parent_id", PARENT_OUTSIDE_MILESTONE);
        }
    }
    check_users_exist(&state.pool, &mut errors, "assigned_to", &input.assigned_to).await?;
    errors.into_result()?;

    let task = SubTaskRepo::create(&state.pool, milestone_id, &input).await?;
    tracing::info!(subtask_id = task.id, milestone_id, "Subtask created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/v1/subtasks/{id}
///
/// Updates status, completion, dates, assignees or the parent link.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubTask>,
) -> AppResult<Json<SubTask>> {
    let current = SubTaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubTask",
            id,
        }))?;
    let milestone = find_milestone(&state, current.milestone_id).await?;
    require_project(&state, &user, milestone.project_id, ProjectAccess::Write).await?;

    let mut errors = validate_subtask(
        input.title.as_deref().unwrap_or(&current.title),
        input.start_date.or(current.start_date),
        input.due_date.or(current.due_date),
    )
    .err()
    .unwrap_or_default();
    if let Some(parent_id) = input.parent_id {
        check_parent(&state, &mut errors, &current, parent_id).await?;
    }
    if let Some(assigned) = &input.assigned_to {
        check_users_exist(&state.pool, &mut errors, "assigned_to", assigned).await?;
    }
    errors.into_result()?;

    let task = SubTaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubTask",
            id,
        }))?;
    Ok(Json(task))
}

async fn check_parent(
    state: &AppState,
    errors: &mut FieldErrors,
    task: &SubTask,
    parent_id: DbId,
) -> AppResult<()> {
    let tree = TaskTree::build(SubTaskRepo::list_by_milestone(&state.pool, task.milestone_id).await?);
    if !tree.contains(parent_id) {
        errors.add("parent_id", PARENT_OUTSIDE_MILESTONE);
    } else if tree.would_create_cycle(task.id, parent_id) {
        errors.add(
            "parent_id",
            "A task cannot be moved beneath itself or one of its subtasks.",
        );
    }
    Ok(())
}
