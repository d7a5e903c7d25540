//! Closed status enumerations for milestones, subtasks and change logs.
//!
//! Values are stored as text in the database; [`WorkStatus::as_str`] and
//! [`WorkStatus::from_str_value`] convert at the repository boundary.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Work status (milestones and subtasks)
// ---------------------------------------------------------------------------

pub const WORK_PLANNED: &str = "planned";
pub const WORK_IN_PROGRESS: &str = "in_progress";
pub const WORK_COMPLETED: &str = "completed";
pub const WORK_DELAYED: &str = "delayed";

/// All valid work status strings.
pub const VALID_WORK_STATUSES: &[&str] =
    &[WORK_PLANNED, WORK_IN_PROGRESS, WORK_COMPLETED, WORK_DELAYED];

/// Progress state shared by milestones and subtasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Delayed,
}

impl WorkStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            WORK_PLANNED => Ok(Self::Planned),
            WORK_IN_PROGRESS => Ok(Self::InProgress),
            WORK_COMPLETED => Ok(Self::Completed),
            WORK_DELAYED => Ok(Self::Delayed),
            _ => Err(format!(
                "Invalid status '{s}'. Must be one of: {}",
                VALID_WORK_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => WORK_PLANNED,
            Self::InProgress => WORK_IN_PROGRESS,
            Self::Completed => WORK_COMPLETED,
            Self::Delayed => WORK_DELAYED,
        }
    }

    /// Whether work in this state still needs doing.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Planned | Self::InProgress)
    }
}

// ---------------------------------------------------------------------------
// Change log status
// ---------------------------------------------------------------------------

pub const CHANGE_DRAFT: &str = "draft";
pub const CHANGE_PENDING: &str = "pending";
pub const CHANGE_APPROVED: &str = "approved";

pub const VALID_CHANGE_STATUSES: &[&str] = &[CHANGE_DRAFT, CHANGE_PENDING, CHANGE_APPROVED];

/// Review state of a project change log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeLogStatus {
    #[default]
    Draft,
    Pending,
    Approved,
}

impl ChangeLogStatus {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            CHANGE_DRAFT => Ok(Self::Draft),
            CHANGE_PENDING => Ok(Self::Pending),
            CHANGE_APPROVED => Ok(Self::Approved),
            _ => Err(format!(
                "Invalid change log status '{s}'. Must be one of: {}",
                VALID_CHANGE_STATUSES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => CHANGE_DRAFT,
            Self::Pending => CHANGE_PENDING,
            Self::Approved => CHANGE_APPROVED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_status_round_trips_through_db_value() {
        for status in [
            WorkStatus::Planned,
            WorkStatus::InProgress,
            WorkStatus::Completed,
            WorkStatus::Delayed,
        ] {
            assert_eq!(WorkStatus::from_str_value(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn work_status_rejects_unknown() {
        let err = WorkStatus::from_str_value("open").unwrap_err();
        assert!(err.contains("Invalid status 'open'"));
    }

    #[test]
    fn only_planned_and_in_progress_are_open() {
        assert!(WorkStatus::Planned.is_open());
        assert!(WorkStatus::InProgress.is_open());
        assert!(!WorkStatus::Completed.is_open());
        assert!(!WorkStatus::Delayed.is_open());
    }

    #[test]
    fn work_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&WorkStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn change_log_status_defaults_to_draft() {
        assert_eq!(ChangeLogStatus::default(), ChangeLogStatus::Draft);
        assert_eq!(
            ChangeLogStatus::from_str_value("approved").unwrap(),
            ChangeLogStatus::Approved
        );
        assert!(ChangeLogStatus::from_str_value("rejected").is_err());
    }
}
