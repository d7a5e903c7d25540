//! Domain logic for labdesk.
//!
//! Pure types and functions shared by the database and API crates. Nothing
//! in this crate performs I/O.

pub mod dashboard;
pub mod document;
pub mod error;
pub mod field_errors;
pub mod membership;
pub mod money;
pub mod project;
pub mod records;
pub mod roles;
pub mod status;
pub mod task_tree;
pub mod types;
