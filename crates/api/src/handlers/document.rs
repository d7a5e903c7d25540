//! Handlers for project documents.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use labdesk_core::document::{storage_path, validate_document_name, validate_upload_size};
use labdesk_core::field_errors::FieldErrors;
use labdesk_core::membership::ProjectAccess;
use labdesk_core::types::DbId;
use labdesk_db::models::document::{CreateDocument, Document};
use labdesk_db::repositories::DocumentRepo;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::access::require_project;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/documents
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Document>>>> {
    require_project(&state, &user, project_id, ProjectAccess::Read).await?;
    let documents = DocumentRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// POST /api/v1/projects/{id}/documents
///
/// Accepts a multipart form with a `name` field and a `file` field. The file
/// is stored under `<media root>/documents/` with a unique prefix.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Document>)> {
    require_project(&state, &user, project_id, ProjectAccess::Write).await?;

    let mut name: Option<String> = None;
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "name" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                name = Some(text);
            }
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some((filename, data.to_vec()));
            }
            _ => {} // ignore unknown fields
        }
    }

    let mut errors = FieldErrors::new();
    let name = name.unwrap_or_default();
    if let Err(msg) = validate_document_name(&name) {
        errors.add("name", msg);
    }
    match &file_data {
        None => errors.add("file", "This field is required."),
        Some((_, data)) => {
            if let Err(msg) = validate_upload_size(data.len(), state.config.max_upload_bytes) {
                errors.add("file", msg);
            }
        }
    }
    errors.into_result()?;
    let Some((original_filename, data)) = file_data else {
        return Err(AppError::BadRequest("Missing required 'file' field".into()));
    };

    let relative_path = storage_path(&Uuid::now_v7().simple().to_string(), &original_filename);
    let absolute_path = state.config.media_root.join(&relative_path);
    if let Some(parent) = absolute_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
    }
    tokio::fs::write(&absolute_path, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let input = CreateDocument {
        project_id,
        name: name.trim().to_string(),
        file_path: relative_path,
        original_filename,
        size_bytes: data.len() as i64,
        sha256: sha256_hex(&data),
        uploaded_by: Some(user.user_id),
    };

    let document = match DocumentRepo::create(&state.pool, &input).await {
        Ok(document) => document,
        Err(e) => {
            if let Err(io_err) = tokio::fs::remove_file(&absolute_path).await {
                tracing::warn!(path = %absolute_path.display(), error = %io_err, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };
    tracing::info!(
        document_id = document.id,
        project_id,
        size_bytes = document.size_bytes,
        "Document uploaded"
    );
    Ok((StatusCode::CREATED, Json(document)))
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
