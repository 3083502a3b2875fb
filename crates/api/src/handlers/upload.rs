//! Handlers for the `/uploads` resource.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::read_upload_form;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::services;
use crate::services::upload::StoredFile;
use crate::state::AppState;
use crate::validation::validate_request;

/// Body of `POST /uploads/urls`.
#[derive(Debug, Deserialize, Validate)]
pub struct PublicUrlsRequest {
    #[validate(length(min = 1, max = 100))]
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PublicUrlsResponse {
    pub urls: Vec<String>,
}

/// POST /api/v1/uploads (multipart, fields `folder` and `file`)
pub async fn upload(
    State(state): State<AppState>,
    _user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<StoredFile>)> {
    let mut form = read_upload_form(multipart).await?;
    let file = form.require_file()?;
    let folder = form
        .folder
        .ok_or_else(|| AppError::BadRequest("Multipart field 'folder' is required".into()))?;

    let stored = services::upload::upload(&state, &folder, file).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// POST /api/v1/uploads/urls
pub async fn public_urls(
    State(state): State<AppState>,
    _user: AuthUser,
    AppJson(input): AppJson<PublicUrlsRequest>,
) -> AppResult<Json<PublicUrlsResponse>> {
    validate_request(&input)?;
    Ok(Json(PublicUrlsResponse {
        urls: services::upload::public_urls(&state, &input.keys),
    }))
}
