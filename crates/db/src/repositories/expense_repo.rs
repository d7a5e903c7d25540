//! Repository for the `expenses` table.

use labdesk_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::expense::{CreateExpense, Expense};

const COLUMNS: &str = "id, project_id, description, amount, expense_date, created_at";

/// Provides CRUD operations for expenses.
pub struct ExpenseRepo;

impl ExpenseRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateExpense,
    ) -> Result<Expense, sqlx::Error> {
        let query = format!(
            "INSERT INTO expenses (project_id, description, amount, expense_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(project_id)
            .bind(input.description.trim())
            .bind(input.amount)
            .bind(input.expense_date)
            .fetch_one(pool)
            .await
    }

    /// Expenses of a project, most recent date first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM expenses
             WHERE project_id = $1
             ORDER BY expense_date DESC, id DESC"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Sum of every expense recorded against a project (zero when none).
    pub async fn total_for_project(pool: &PgPool, project_id: DbId) -> Result<Decimal, sqlx::Error> {
        sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0)::NUMERIC(14, 2) FROM expenses WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }
}
