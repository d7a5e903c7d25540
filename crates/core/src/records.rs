//! Field checks for project child records: milestones, subtasks, change
//! logs and expenses.

use rust_decimal::Decimal;

use crate::field_errors::FieldErrors;
use crate::money::validate_money;
use crate::types::Date;

pub const MAX_MILESTONE_TITLE_LENGTH: usize = 200;
pub const MAX_SUBTASK_TITLE_LENGTH: usize = 200;
pub const MAX_CHANGELOG_TITLE_LENGTH: usize = 255;
pub const MAX_EXPENSE_DESCRIPTION_LENGTH: usize = 255;

fn check_text(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "This field is required.");
    } else if trimmed.chars().count() > max {
        errors.add(field, format!("Ensure this value has at most {max} characters."));
    }
}

fn check_dates(errors: &mut FieldErrors, start: Option<Date>, due: Option<Date>) {
    if let (Some(start), Some(due)) = (start, due) {
        if start > due {
            errors.add("due_date", "The due date cannot be earlier than the start date.");
        }
    }
}

/// Validate milestone title and date ordering.
pub fn validate_milestone(
    title: &str,
    start_date: Option<Date>,
    due_date: Option<Date>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_text(&mut errors, "title", title, MAX_MILESTONE_TITLE_LENGTH);
    check_dates(&mut errors, start_date, due_date);
    errors.into_result()
}

/// Validate subtask title and date ordering.
pub fn validate_subtask(
    title: &str,
    start_date: Option<Date>,
    due_date: Option<Date>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_text(&mut errors, "title", title, MAX_SUBTASK_TITLE_LENGTH);
    check_dates(&mut errors, start_date, due_date);
    errors.into_result()
}

/// Validate a change log entry.
pub fn validate_changelog(title: &str, description: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_text(&mut errors, "title", title, MAX_CHANGELOG_TITLE_LENGTH);
    if description.trim().is_empty() {
        errors.add("description", "This field is required.");
    }
    errors.into_result()
}

/// Validate an expense description and amount.
pub fn validate_expense(description: &str, amount: Decimal) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_text(
        &mut errors,
        "description",
        description,
        MAX_EXPENSE_DESCRIPTION_LENGTH,
    );
    if let Err(msg) = validate_money(amount) {
        errors.add("amount", msg);
    }
    errors.into_result()
}
