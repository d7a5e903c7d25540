//! Project field set, validation rules, and schedule helpers.
//!
//! [`ProjectFields`] is the candidate record submitted by a create or edit
//! request. [`validate`] applies the cross-field business rules;
//! [`ProjectFields::clean`] additionally runs per-field checks (presence,
//! length, email and phone format, money precision) and, when everything
//! passes, yields a [`ProjectRecord`] with every required value present.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

use crate::field_errors::FieldErrors;
use crate::money::validate_money;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Accepted phone numbers: optional leading `+`, digits, spaces, dashes, parentheses.
pub const PHONE_PATTERN: &str = r"^\+?[0-9][0-9 ()\-]{2,19}$";

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("valid regex"));

/// Maximum length of a phone number field.
pub const MAX_PHONE_LENGTH: usize = 20;

pub const PROJECT_TYPE_INDIVIDUAL: &str = "IND";
pub const PROJECT_TYPE_MULTI_PARTY: &str = "GR";

// ---------------------------------------------------------------------------
// Project type
// ---------------------------------------------------------------------------

/// Whether a project is run by a single institution or a consortium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    #[serde(rename = "IND")]
    Individual,
    #[serde(rename = "GR")]
    MultiParty,
}

impl ProjectType {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            PROJECT_TYPE_INDIVIDUAL => Ok(Self::Individual),
            PROJECT_TYPE_MULTI_PARTY => Ok(Self::MultiParty),
            _ => Err(format!(
                "Invalid project type '{s}'. Must be one of: {PROJECT_TYPE_INDIVIDUAL}, {PROJECT_TYPE_MULTI_PARTY}"
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => PROJECT_TYPE_INDIVIDUAL,
            Self::MultiParty => PROJECT_TYPE_MULTI_PARTY,
        }
    }
}

// ---------------------------------------------------------------------------
// Candidate fields
// ---------------------------------------------------------------------------

/// Full set of project fields as submitted by a create or edit form.
///
/// Any value may be missing; presence is enforced by [`ProjectFields::clean`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProjectFields {
    #[validate(length(min = 1, max = 50, message = "Internal number must be 1-50 characters."))]
    pub internal_number: String,
    #[validate(length(min = 1, max = 250, message = "Title must be 1-250 characters."))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters."))]
    pub description: String,

    #[validate(required(message = "This field is required."))]
    pub principal_investigator_id: Option<DbId>,
    #[validate(email(message = "Enter a valid email address."))]
    pub pi_email: String,
    pub pi_phone: String,

    #[validate(length(max = 150, message = "Contact person must be at most 150 characters."))]
    pub contact_person: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,

    #[validate(required(message = "This field is required."))]
    pub project_type: Option<ProjectType>,
    #[validate(length(max = 200, message = "Project leader must be at most 200 characters."))]
    pub project_leader: Option<String>,
    #[validate(length(max = 500, message = "Domestic partners must be at most 500 characters."))]
    pub domestic_partners: Option<String>,
    #[validate(length(max = 500, message = "Foreign partners must be at most 500 characters."))]
    pub foreign_partners: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Funding agency must be 1-200 characters."))]
    pub funding_agency: String,
    #[validate(length(min = 1, max = 150, message = "Call name must be 1-150 characters."))]
    pub call_name: String,
    #[validate(required(message = "This field is required."))]
    pub funding_decision_date: Option<Date>,
    #[validate(length(min = 1, max = 100, message = "Funding number must be 1-100 characters."))]
    pub funding_number: String,
    #[validate(length(max = 100, message = "Agreement number must be at most 100 characters."))]
    pub agreement_number: String,
    #[validate(required(message = "This field is required."))]
    pub agreement_sign_date: Option<Date>,
    #[validate(required(message = "This field is required."))]
    pub start_date: Option<Date>,
    #[validate(required(message = "This field is required."))]
    pub end_date: Option<Date>,

    #[validate(length(min = 1, max = 200, message = "Executing unit must be 1-200 characters."))]
    pub executing_unit: String,
    #[validate(required(message = "This field is required."))]
    pub budget_total: Option<Decimal>,

    #[validate(required(message = "This field is required."))]
    pub project_support_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// A project record that passed every check. Required values are no longer optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub internal_number: String,
    pub title: String,
    pub description: String,
    pub principal_investigator_id: DbId,
    pub pi_email: String,
    pub pi_phone: String,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub project_type: ProjectType,
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
    pub is_active: bool,
}

impl ProjectFields {
    /// Run field checks and cross-field rules, returning every error found.
    ///
    /// Strings are trimmed first and blank optional strings become `None`.
    pub fn clean(&self) -> Result<ProjectRecord, FieldErrors> {
        let fields = self.normalized();

        let mut errors = fields.field_errors();
        if let Err(rule_errors) = validate(&fields) {
            errors.merge(rule_errors);
        }
        errors.into_result()?;

        fields.into_record()
    }

    fn normalized(&self) -> Self {
        let trim = |s: &String| s.trim().to_string();
        let trim_opt = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            internal_number: trim(&self.internal_number),
            title: trim(&self.title),
            description: trim(&self.description),
            principal_investigator_id: self.principal_investigator_id,
            pi_email: trim(&self.pi_email),
            pi_phone: trim(&self.pi_phone),
            contact_person: trim_opt(&self.contact_person),
            contact_email: trim_opt(&self.contact_email),
            contact_phone: trim_opt(&self.contact_phone),
            project_type: self.project_type,
            project_leader: trim_opt(&self.project_leader),
            domestic_partners: trim_opt(&self.domestic_partners),
            foreign_partners: trim_opt(&self.foreign_partners),
            funding_agency: trim(&self.funding_agency),
            call_name: trim(&self.call_name),
            funding_decision_date: self.funding_decision_date,
            funding_number: trim(&self.funding_number),
            agreement_number: trim(&self.agreement_number),
            agreement_sign_date: self.agreement_sign_date,
            start_date: self.start_date,
            end_date: self.end_date,
            executing_unit: trim(&self.executing_unit),
            budget_total: self.budget_total,
            project_support_id: self.project_support_id,
            is_active: self.is_active,
        }
    }

    /// Per-field checks: the derived rules plus phone format and money precision.
    fn field_errors(&self) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        if let Err(msg) = validate_phone(&self.pi_phone) {
            errors.add("pi_phone", msg);
        }
        if let Some(phone) = self.contact_phone.as_deref() {
            if let Err(msg) = validate_phone(phone) {
                errors.add("contact_phone", msg);
            }
        }
        if let Some(budget) = self.budget_total {
            if let Err(msg) = validate_money(budget) {
                errors.add("budget_total", msg);
            }
        }
        errors
    }

    fn into_record(self) -> Result<ProjectRecord, FieldErrors> {
        let (
            Some(principal_investigator_id),
            Some(project_type),
            Some(funding_decision_date),
            Some(agreement_sign_date),
            Some(start_date),
            Some(end_date),
            Some(budget_total),
            Some(project_support_id),
        ) = (
            self.principal_investigator_id,
            self.project_type,
            self.funding_decision_date,
            self.agreement_sign_date,
            self.start_date,
            self.end_date,
            self.budget_total,
            self.project_support_id,
        )
        else {
            return Err(FieldErrors::single(
                "__all__",
                "Required project fields are missing.",
            ));
        };

        Ok(ProjectRecord {
            internal_number: self.internal_number,
            title: self.title,
            description: self.description,
            principal_investigator_id,
            pi_email: self.pi_email,
            pi_phone: self.pi_phone,
            contact_person: self.contact_person,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            project_type,
            project_leader: self.project_leader,
            domestic_partners: self.domestic_partners,
            foreign_partners: self.foreign_partners,
            funding_agency: self.funding_agency,
            call_name: self.call_name,
            funding_decision_date,
            funding_number: self.funding_number,
            agreement_number: self.agreement_number,
            agreement_sign_date,
            start_date,
            end_date,
            executing_unit: self.executing_unit,
            budget_total,
            project_support_id,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

/// Validate a phone number: non-empty, within length, allowed characters only.
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.is_empty() {
        return Err("This field is required.".to_string());
    }
    if phone.len() > MAX_PHONE_LENGTH {
        return Err(format!(
            "Phone number must be at most {MAX_PHONE_LENGTH} characters."
        ));
    }
    if !PHONE_RE.is_match(phone) {
        return Err("Enter a valid phone number.".to_string());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Cross-field rules
// ---------------------------------------------------------------------------

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Apply the project business rules to a candidate record.
///
/// The contact-block rule and the funding/agreement ordering rule stop at
/// the first violation and report only their own fields. The multi-party,
/// start-vs-decision and start-vs-end rules accumulate and are reported
/// together. Date rules only apply when both dates are present.
pub fn validate(candidate: &ProjectFields) -> Result<(), FieldErrors> {
    if !is_blank(candidate.contact_person.as_deref()) {
        if is_blank(candidate.contact_email.as_deref()) {
            return Err(FieldErrors::single(
                "contact_email",
                "Provide a contact email when a contact person is given.",
            ));
        }
        if is_blank(candidate.contact_phone.as_deref()) {
            return Err(FieldErrors::single(
                "contact_phone",
                "Provide a contact phone when a contact person is given.",
            ));
        }
    }

    let mut errors = FieldErrors::new();

    if candidate.project_type == Some(ProjectType::MultiParty) {
        if is_blank(candidate.project_leader.as_deref()) {
            errors.add("project_leader", "Required for multi-party projects.");
        }
        if is_blank(candidate.domestic_partners.as_deref())
            && is_blank(candidate.foreign_partners.as_deref())
        {
            let msg = "Provide domestic or foreign partners for a multi-party project.";
            errors.add("domestic_partners", msg);
            errors.add("foreign_partners", msg);
        }
    }

    if let (Some(decision), Some(signed)) =
        (candidate.funding_decision_date, candidate.agreement_sign_date)
    {
        if decision > signed {
            let mut paired = FieldErrors::new();
            paired.add(
                "funding_decision_date",
                "The funding decision date cannot be later than the agreement sign date.",
            );
            paired.add(
                "agreement_sign_date",
                "The agreement sign date cannot be earlier than the funding decision.",
            );
            return Err(paired);
        }
    }

    if let (Some(start), Some(decision)) = (candidate.start_date, candidate.funding_decision_date)
    {
        if start < decision {
            errors.add(
                "start_date",
                "The project cannot start before the funding decision.",
            );
            errors.add(
                "funding_decision_date",
                "The funding decision must precede the project start.",
            );
        }
    }

    if let (Some(start), Some(end)) = (candidate.start_date, candidate.end_date) {
        if start > end {
            errors.add(
                "start_date",
                "The start date cannot be later than the end date.",
            );
            errors.add("end_date", "The end date cannot be earlier than the start date.");
        }
    }

    errors.into_result()
}

// ---------------------------------------------------------------------------
// Schedule helpers
// ---------------------------------------------------------------------------

/// Where a project stands relative to its schedule on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    NotStarted,
    InProgress,
    Finished,
}

impl ProjectStatus {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::Finished => "Finished",
        }
    }
}

/// Compute the schedule status of a project on `today`.
pub fn project_status(start: Date, end: Date, today: Date) -> ProjectStatus {
    if today < start {
        ProjectStatus::NotStarted
    } else if today <= end {
        ProjectStatus::InProgress
    } else {
        ProjectStatus::Finished
    }
}

/// Days left until the project end date.
///
/// Serializes as the string `"finished"` or as the integer day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysRemaining {
    Finished,
    Days(i64),
}

impl Serialize for DaysRemaining {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finished => serializer.serialize_str("finished"),
            Self::Days(n) => serializer.serialize_i64(*n),
        }
    }
}

/// `Finished` once `end` has passed, otherwise `end - today` in days.
pub fn days_remaining(end: Date, today: Date) -> DaysRemaining {
    if end < today {
        DaysRemaining::Finished
    } else {
        DaysRemaining::Days((end - today).num_days())
    }
}
