//! Image uploads to object storage.

use kindquest_core::error::CoreError;
use kindquest_core::storage_keys::{self, MAX_UPLOAD_BYTES};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A file received from a multipart form.
#[derive(Debug)]
pub struct IncomingFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Where an uploaded object ended up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub key: String,
    pub url: String,
}

/// Check type and size, then store `file` under `key_for(extension)`.
pub(crate) async fn store(
    state: &AppState,
    file: IncomingFile,
    key_for: impl FnOnce(&str) -> String,
) -> AppResult<StoredFile> {
    if file.bytes.is_empty() {
        return Err(CoreError::Validation("Uploaded file is empty".into()).into());
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "File exceeds the {} MiB limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ))
        .into());
    }
    let extension = storage_keys::image_extension(&file.filename, &file.content_type)?;
    let key = key_for(&extension);
    let size = file.bytes.len();

    state
        .storage
        .put(&key, file.bytes, &file.content_type)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::info!(key = %key, size, "File stored");
    let url = state.storage.public_url(&key);
    Ok(StoredFile { key, url })
}

/// `POST /uploads`: store an image under `<folder>/<uuid>.<ext>`.
pub async fn upload(state: &AppState, folder: &str, file: IncomingFile) -> AppResult<StoredFile> {
    storage_keys::validate_folder(folder)?;
    store(state, file, |ext| storage_keys::folder_key(folder, ext)).await
}

/// Public URLs for stored keys, in request order.
pub fn public_urls(state: &AppState, keys: &[String]) -> Vec<String> {
    state.storage.public_urls(keys)
}

/// Delete objects, logging failures instead of returning them.
pub(crate) async fn delete_best_effort(state: &AppState, keys: &[String]) {
    for key in keys {
        if let Err(e) = state.storage.delete(key).await {
            tracing::warn!(key = %key, error = %e, "Failed to delete stored object");
        }
    }
}
