//! Document entity model and DTOs.

use labdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    /// Path relative to the media root.
    pub file_path: String,
    pub original_filename: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub uploaded_at: Timestamp,
    pub uploaded_by: Option<DbId>,
}

/// Document with its project's title, for cross-project listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentWithProject {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub document: Document,
    pub project_title: String,
}

/// DTO for inserting a document after the file has been stored.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub project_id: DbId,
    pub name: String,
    pub file_path: String,
    pub original_filename: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub uploaded_by: Option<DbId>,
}
