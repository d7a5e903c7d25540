pub mod auth;
pub mod health;
pub mod me;
pub mod milestone;
pub mod project;

use axum::routing::{get, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/me                                         current user
///
/// /projects                                        my projects, create
/// /projects/joinable                               active projects
/// /projects/join                                   membership request (POST)
/// /projects/{id}                                   get, update, delete (admin)
/// /projects/{id}/members                           list members
/// /projects/{id}/members/{membership_id}/approve   approve request (POST)
/// /projects/{id}/milestones                        list, create
/// /projects/{id}/documents                         list, upload (multipart)
/// /projects/{id}/changelogs                        list, create
/// /projects/{id}/expenses                          list with total, create
///
/// /milestones/{id}                                 get with task tree, update
/// /milestones/{id}/subtasks                        create (POST)
/// /subtasks/{id}                                   update (PUT)
///
/// /me/projects                                     my projects with role
/// /me/tasks                                        tasks assigned to me
/// /me/changelogs                                   change logs of my projects
/// /me/calendar                                     milestones and tasks due from today
///
/// /dashboard                                       dashboard widgets
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
        .nest("/milestones", milestone::router())
        .route("/subtasks/{id}", put(handlers::subtask::update))
        .nest("/me", me::router())
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
}
