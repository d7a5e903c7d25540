//! Route definitions for the `/projects` resource.
//!
//! Also nests membership, milestone, document, change log and expense
//! routes under `/projects/{id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{changelog, document, expense, membership, milestone, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                      -> list
/// POST   /                                      -> create
/// GET    /joinable                              -> list_joinable
/// POST   /join                                  -> join
/// GET    /{id}                                  -> get_by_id
/// PUT    /{id}                                  -> update
/// DELETE /{id}                                  -> delete
///
/// GET    /{id}/members                          -> list_members
/// POST   /{id}/members/{membership_id}/approve  -> approve
///
/// GET    /{id}/milestones                       -> list_by_project
/// POST   /{id}/milestones                       -> create
/// GET    /{id}/documents                        -> list_by_project
/// POST   /{id}/documents                        -> upload
/// GET    /{id}/changelogs                       -> list_by_project
/// POST   /{id}/changelogs                       -> create
/// GET    /{id}/expenses                         -> list_by_project
/// POST   /{id}/expenses                         -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/joinable", get(project::list_joinable))
        .route("/join", post(membership::join))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/members", get(membership::list_members))
        .route(
            "/{id}/members/{membership_id}/approve",
            post(membership::approve),
        )
        .route(
            "/{id}/milestones",
            get(milestone::list_by_project).post(milestone::create),
        )
        .route(
            "/{id}/documents",
            get(document::list_by_project).post(document::upload),
        )
        .route(
            "/{id}/changelogs",
            get(changelog::list_by_project).post(changelog::create),
        )
        .route(
            "/{id}/expenses",
            get(expense::list_by_project).post(expense::create),
        )
}
