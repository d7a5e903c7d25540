//! Expense entity model and DTOs.

use labdesk_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `expenses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Expense {
    pub id: DbId,
    pub project_id: DbId,
    pub description: String,
    pub amount: Decimal,
    pub expense_date: Date,
    pub created_at: Timestamp,
}

/// DTO for recording an expense. `project_id` comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpense {
    pub description: String,
    pub amount: Decimal,
    pub expense_date: Date,
}
