//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where the resource is editable, an update DTO (all `Option` fields)

pub mod changelog;
pub mod dashboard;
pub mod document;
pub mod expense;
pub mod membership;
pub mod milestone;
pub mod project;
pub mod subtask;
pub mod user;
