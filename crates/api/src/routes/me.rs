//! Route definitions for `/me`.

use axum::routing::get;
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// Routes mounted at `/me`.
///
/// ```text
/// GET    /projects     -> projects
/// GET    /tasks        -> tasks
/// GET    /changelogs   -> changelogs
/// GET    /calendar     -> calendar
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(me::projects))
        .route("/tasks", get(me::tasks))
        .route("/changelogs", get(me::changelogs))
        .route("/calendar", get(me::calendar))
}
