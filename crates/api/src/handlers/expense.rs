//! Handlers for project expenses.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labdesk_core::membership::ProjectAccess;
use labdesk_core::records::validate_expense;
use labdesk_core::types::DbId;
use labdesk_db::models::expense::{CreateExpense, Expense};
use labdesk_db::repositories::ExpenseRepo;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::access::require_project;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Expense list with the running total for the project.
#[derive(Debug, Serialize)]
pub struct ExpenseSummary {
    pub expenses: Vec<Expense>,
    pub total: Decimal,
    pub budget_total: Decimal,
}

/// GET /api/v1/projects/{id}/expenses
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ExpenseSummary>>> {
    let project = require_project(&state, &user, project_id, ProjectAccess::Read).await?;
    let expenses = ExpenseRepo::list_by_project(&state.pool, project_id).await?;
    let total = ExpenseRepo::total_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse {
        data: ExpenseSummary {
            expenses,
            total,
            budget_total: project.budget_total,
        },
    }))
}

/// POST /api/v1/projects/{id}/expenses
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateExpense>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    require_project(&state, &user, project_id, ProjectAccess::Write).await?;
    validate_expense(&input.description, input.amount)?;

    let expense = ExpenseRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(expense_id = expense.id, project_id, amount = %expense.amount, "Expense recorded");
    Ok((StatusCode::CREATED, Json(expense)))
}
