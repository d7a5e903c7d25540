//! Document upload naming and validation rules.

/// Maximum length of a document display name.
pub const MAX_DOCUMENT_NAME_LENGTH: usize = 200;

/// Sub-directory of the media root that holds uploaded documents.
pub const DOCUMENTS_DIR: &str = "documents";

/// Maximum length kept from the client-supplied file name.
const MAX_STORED_NAME_LENGTH: usize = 100;

/// Validate a document display name: non-empty after trimming and within length.
pub fn validate_document_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Document name cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_DOCUMENT_NAME_LENGTH {
        return Err(format!(
            "Document name exceeds maximum length of {MAX_DOCUMENT_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Reduce a client file name to a safe, flat name.
///
/// Directory components are dropped and anything outside `[A-Za-z0-9._-]`
/// becomes `_`. Leading dots are stripped so the result is never hidden.
/// Returns `"upload"` when nothing usable remains.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    let cleaned: String = cleaned.chars().take(MAX_STORED_NAME_LENGTH).collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Relative storage path for a document: `documents/<prefix>_<sanitized name>`.
pub fn storage_path(unique_prefix: &str, original: &str) -> String {
    format!(
        "{DOCUMENTS_DIR}/{unique_prefix}_{}",
        sanitize_file_name(original)
    )
}

/// Validate an upload's size against the configured ceiling.
pub fn validate_upload_size(len: usize, max_bytes: usize) -> Result<(), String> {
    if len == 0 {
        return Err("Uploaded file is empty".to_string());
    }
    if len > max_bytes {
        return Err(format!("Uploaded file exceeds the {max_bytes} byte limit"));
    }
    Ok(())
}
