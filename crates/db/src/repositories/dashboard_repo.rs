//! Aggregate queries backing the per-user dashboard.

use labdesk_core::types::DbId;
use sqlx::PgPool;

use super::USER_PROJECT_IDS;

/// Read-only dashboard counters.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Number of active projects the user belongs to.
    pub async fn count_active_projects(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM projects WHERE is_active = true AND id IN ({USER_PROJECT_IDS})"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
