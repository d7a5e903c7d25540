//! Project membership roles and access rules.
//!
//! A user's standing in a project is the set of their membership rows for
//! that project. Pending rows (`is_active = false`) grant read access only.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Maximum length of a membership note.
pub const MAX_NOTE_LENGTH: usize = 500;

pub const ROLE_PI: &str = "PI";
pub const ROLE_STEWARD: &str = "PS";
pub const ROLE_COLLABORATOR: &str = "CO";
pub const ROLE_PROJECT_ADMIN: &str = "AD";

pub const VALID_PROJECT_ROLES: &[&str] =
    &[ROLE_PI, ROLE_STEWARD, ROLE_COLLABORATOR, ROLE_PROJECT_ADMIN];

/// Role a user holds within a single project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectRole {
    #[serde(rename = "PI")]
    PrincipalInvestigator,
    #[serde(rename = "PS")]
    Steward,
    #[serde(rename = "CO")]
    Collaborator,
    #[serde(rename = "AD")]
    Administrator,
}

impl ProjectRole {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            ROLE_PI => Ok(Self::PrincipalInvestigator),
            ROLE_STEWARD => Ok(Self::Steward),
            ROLE_COLLABORATOR => Ok(Self::Collaborator),
            ROLE_PROJECT_ADMIN => Ok(Self::Administrator),
            _ => Err(format!(
                "Invalid project role '{s}'. Must be one of: {}",
                VALID_PROJECT_ROLES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrincipalInvestigator => ROLE_PI,
            Self::Steward => ROLE_STEWARD,
            Self::Collaborator => ROLE_COLLABORATOR,
            Self::Administrator => ROLE_PROJECT_ADMIN,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PrincipalInvestigator => "Principal investigator",
            Self::Steward => "Project steward",
            Self::Collaborator => "Collaborator",
            Self::Administrator => "Administrator",
        }
    }

    /// Roles allowed to edit the project and approve join requests.
    pub fn can_manage(&self) -> bool {
        !matches!(self, Self::Collaborator)
    }
}

/// What a request wants to do with a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAccess {
    /// View the project and its child records.
    Read,
    /// Add or change child records.
    Write,
    /// Edit the project itself or approve memberships.
    Manage,
}

/// One membership row reduced to what access checks need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberStanding {
    pub role: ProjectRole,
    pub is_active: bool,
}

/// Decide whether a user may perform `access` on a project.
///
/// System administrators always pass.
pub fn is_allowed(standing: &[MemberStanding], is_system_admin: bool, access: ProjectAccess) -> bool {
    if is_system_admin {
        return true;
    }
    match access {
        ProjectAccess::Read => !standing.is_empty(),
        ProjectAccess::Write => standing.iter().any(|m| m.is_active),
        ProjectAccess::Manage => standing.iter().any(|m| m.is_active && m.role.can_manage()),
    }
}

/// Memberships granted when a project is created.
///
/// The principal investigator and the steward get their own roles; the
/// creator becomes a project administrator unless already covered.
pub fn initial_memberships(
    creator_id: DbId,
    principal_investigator_id: DbId,
    steward_id: DbId,
) -> Vec<(DbId, ProjectRole)> {
    let mut out = lead_memberships(principal_investigator_id, steward_id);
    if creator_id != principal_investigator_id && creator_id != steward_id {
        out.push((creator_id, ProjectRole::Administrator));
    }
    out
}

/// Approved memberships the principal investigator and the steward must hold.
pub fn lead_memberships(principal_investigator_id: DbId, steward_id: DbId) -> Vec<(DbId, ProjectRole)> {
    vec![
        (principal_investigator_id, ProjectRole::PrincipalInvestigator),
        (steward_id, ProjectRole::Steward),
    ]
}

/// Validate a join-request note.
pub fn validate_note(note: &str) -> Result<(), String> {
    if note.chars().count() > MAX_NOTE_LENGTH {
        return Err(format!(
            "Note exceeds maximum length of {MAX_NOTE_LENGTH} characters"
        ));
    }
    Ok(())
}
