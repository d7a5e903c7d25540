//! Route definitions for `/milestones`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{milestone, subtask};
use crate::state::AppState;

/// Routes mounted at `/milestones`.
///
/// ```text
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// POST   /{id}/subtasks   -> subtask::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(milestone::get_by_id).put(milestone::update))
        .route("/{id}/subtasks", post(subtask::create))
}
