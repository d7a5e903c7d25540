//! Per-project permission checks.
//!
//! Handlers call [`require_project`] with the access level they need; it
//! loads the project and the caller's memberships and applies
//! [`labdesk_core::membership::is_allowed`].

use labdesk_core::error::CoreError;
use labdesk_core::membership::{is_allowed, MemberStanding, ProjectAccess};
use labdesk_core::types::DbId;
use labdesk_db::models::project::Project;
use labdesk_db::repositories::{MembershipRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Load a project and check that `user` may perform `access` on it.
///
/// Unknown projects yield 404; known projects the user may not touch yield 403.
pub async fn require_project(
    state: &AppState,
    user: &AuthUser,
    project_id: DbId,
    access: ProjectAccess,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let standing: Vec<MemberStanding> =
        MembershipRepo::list_for_user_in_project(&state.pool, user.user_id, project_id)
            .await?
            .iter()
            .filter_map(|m| m.standing())
            .collect();

    if !is_allowed(&standing, user.is_admin(), access) {
        tracing::debug!(
            user_id = user.user_id,
            project_id,
            ?access,
            "Project access denied"
        );
        let message = match access {
            ProjectAccess::Read => "You are not a member of this project",
            ProjectAccess::Write => "An approved membership is required",
            ProjectAccess::Manage => "A managing role in this project is required",
        };
        return Err(AppError::Core(CoreError::Forbidden(message.into())));
    }

    Ok(project)
}
