//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod changelog_repo;
pub mod dashboard_repo;
pub mod document_repo;
pub mod expense_repo;
pub mod membership_repo;
pub mod milestone_repo;
pub mod project_repo;
pub mod role_repo;
pub mod subtask_repo;
pub mod user_repo;

pub use changelog_repo::ChangeLogRepo;
pub use dashboard_repo::DashboardRepo;
pub use document_repo::DocumentRepo;
pub use expense_repo::ExpenseRepo;
pub use membership_repo::MembershipRepo;
pub use milestone_repo::MilestoneRepo;
pub use project_repo::ProjectRepo;
pub use role_repo::RoleRepo;
pub use subtask_repo::SubTaskRepo;
pub use user_repo::UserRepo;

/// Subquery selecting the ids of every project `$1` is a member of.
pub(crate) const USER_PROJECT_IDS: &str =
    "SELECT project_id FROM project_memberships WHERE user_id = $1";
