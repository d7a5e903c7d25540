//! Project entity model.
//!
//! Projects are created and edited through
//! [`labdesk_core::project::ProjectFields`]; the repository only ever writes
//! a validated [`labdesk_core::project::ProjectRecord`].

use labdesk_core::project::{days_remaining, project_status, DaysRemaining, ProjectStatus};
use labdesk_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub is_active: bool,
    pub internal_number: String,
    pub title: String,
    pub description: String,
    pub principal_investigator_id: DbId,
    pub pi_email: String,
    pub pi_phone: String,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// `IND` or `GR`.
    pub project_type: String,
    pub project_leader: Option<String>,
    pub domestic_partners: Option<String>,
    pub foreign_partners: Option<String>,
    pub funding_agency: String,
    pub call_name: String,
    pub funding_decision_date: Date,
    pub funding_number: String,
    pub agreement_number: String,
    pub agreement_sign_date: Date,
    pub start_date: Date,
    pub end_date: Date,
    pub executing_unit: String,
    pub budget_total: Decimal,
    pub project_support_id: DbId,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn status(&self, today: Date) -> ProjectStatus {
        project_status(self.start_date, self.end_date, today)
    }

    pub fn days_remaining(&self, today: Date) -> DaysRemaining {
        days_remaining(self.end_date, today)
    }

    /// Display string used in listings, e.g. `Project: Soil survey (ABC123)`.
    pub fn display_name(&self) -> String {
        format!("Project: {} ({})", self.title, self.internal_number)
    }
}
