pub mod auth;
pub mod changelog;
pub mod dashboard;
pub mod document;
pub mod expense;
pub mod me;
pub mod membership;
pub mod milestone;
pub mod project;
pub mod subtask;

use labdesk_core::field_errors::FieldErrors;
use labdesk_core::types::{Date, DbId};
use labdesk_db::repositories::UserRepo;
use labdesk_db::DbPool;

/// The calendar day used for schedule and "upcoming" computations.
pub(crate) fn today() -> Date {
    chrono::Utc::now().date_naive()
}

/// Record a field error on `field` for every id that is not an active user.
pub(crate) async fn check_users_exist(
    pool: &DbPool,
    errors: &mut FieldErrors,
    field: &str,
    ids: &[DbId],
) -> Result<(), sqlx::Error> {
    for id in UserRepo::missing_ids(pool, ids).await? {
        errors.add(field, format!("User with id {id} does not exist."));
    }
    Ok(())
}
