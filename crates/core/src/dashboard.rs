//! Dashboard widget limits and date windows.

use chrono::Duration;

use crate::status::{WORK_IN_PROGRESS, WORK_PLANNED};
use crate::types::Date;

/// Active projects shown on the dashboard, soonest end date first.
pub const DASHBOARD_PROJECT_LIMIT: i64 = 5;

/// Most recently uploaded documents across the user's projects.
pub const DASHBOARD_DOCUMENT_LIMIT: i64 = 6;

/// Milestones due today or later across the user's projects.
pub const DASHBOARD_MILESTONE_LIMIT: i64 = 6;

/// Most recent change log entries across the user's projects.
pub const DASHBOARD_CHANGELOG_LIMIT: i64 = 5;

/// Days ahead covered by the "upcoming tasks" widget, inclusive.
pub const UPCOMING_TASK_DAYS: i64 = 7;

/// Statuses counted as upcoming work.
pub const OPEN_TASK_STATUSES: &[&str] = &[WORK_PLANNED, WORK_IN_PROGRESS];

/// Inclusive `(from, to)` due-date window for upcoming tasks.
pub fn upcoming_task_window(today: Date) -> (Date, Date) {
    (today, today + Duration::days(UPCOMING_TASK_DAYS))
}
