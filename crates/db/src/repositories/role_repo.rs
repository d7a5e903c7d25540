//! Repository for the `roles` table.

use labdesk_core::types::DbId;
use sqlx::PgPool;

/// Read access to system roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Resolve a role id to its name. Fails with `RowNotFound` for unknown ids.
    pub async fn resolve_name(pool: &PgPool, id: DbId) -> Result<String, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
