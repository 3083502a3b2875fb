pub mod achievement;
pub mod auth;
pub mod city;
pub mod lookup;
pub mod organization;
pub mod progress_update;
pub mod quest;
pub mod region;
pub mod ticket;
pub mod upload;
pub mod user;

use axum::extract::Multipart;

use crate::error::{AppError, AppResult};
use crate::services::upload::IncomingFile;

/// Parts of a multipart upload form: the `file` field and the optional
/// `folder` text field.
#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    pub file: Option<IncomingFile>,
    pub folder: Option<String>,
}

/// Read an upload form, ignoring unknown fields.
pub(crate) async fn read_upload_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.file = Some(IncomingFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("folder") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.folder = Some(text.trim().to_string());
            }
            _ => {}
        }
    }

    Ok(form)
}

impl UploadForm {
    pub(crate) fn require_file(&mut self) -> AppResult<IncomingFile> {
        self.file
            .take()
            .ok_or_else(|| AppError::BadRequest("Multipart field 'file' is required".into()))
    }
}
