//! Repository for the `documents` table.

use labdesk_core::types::DbId;
use sqlx::PgPool;

use super::USER_PROJECT_IDS;
use crate::models::document::{CreateDocument, Document, DocumentWithProject};

const COLUMNS: &str = "id, project_id, name, file_path, original_filename, size_bytes, sha256, \
                       uploaded_at, uploaded_by";

const D_COLUMNS: &str = "d.id, d.project_id, d.name, d.file_path, d.original_filename, \
                         d.size_bytes, d.sha256, d.uploaded_at, d.uploaded_by";

/// Provides CRUD operations for documents.
pub struct DocumentRepo;

impl DocumentRepo {
    pub async fn create(pool: &PgPool, input: &CreateDocument) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents
                (project_id, name, file_path, original_filename, size_bytes, sha256, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.file_path)
            .bind(&input.original_filename)
            .bind(input.size_bytes)
            .bind(&input.sha256)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Documents of a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE project_id = $1
             ORDER BY uploaded_at DESC, id DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Most recent documents across the user's projects.
    pub async fn list_recent_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<DocumentWithProject>, sqlx::Error> {
        let query = format!(
            "SELECT {D_COLUMNS}, p.title AS project_title
             FROM documents d
             JOIN projects p ON p.id = d.project_id
             WHERE d.project_id IN ({USER_PROJECT_IDS})
             ORDER BY d.uploaded_at DESC, d.id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, DocumentWithProject>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
