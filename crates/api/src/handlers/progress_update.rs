//! Handlers for `/quests/{id}/updates` and `/organizations/{id}/updates`.
//!
//! The route tree attaches the [`UpdateParent`] as a request extension.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use kindquest_core::types::DbId;
use kindquest_db::models::progress_update::{
    CreateProgressUpdate, ProgressUpdate, UpdateParent, UpdateProgressUpdate,
};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::services;
use crate::state::AppState;
use crate::validation::validate_request;

pub async fn list(
    State(state): State<AppState>,
    Extension(parent): Extension<UpdateParent>,
    Path(parent_id): Path<DbId>,
) -> AppResult<Json<Vec<ProgressUpdate>>> {
    Ok(Json(
        services::progress_update::list(&state, parent, parent_id).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(parent): Extension<UpdateParent>,
    user: AuthUser,
    Path(parent_id): Path<DbId>,
    AppJson(input): AppJson<CreateProgressUpdate>,
) -> AppResult<(StatusCode, Json<ProgressUpdate>)> {
    validate_request(&input)?;
    let post =
        services::progress_update::create(&state, user.user_id, parent, parent_id, &input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(parent): Extension<UpdateParent>,
    user: AuthUser,
    Path((parent_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateProgressUpdate>,
) -> AppResult<Json<ProgressUpdate>> {
    validate_request(&input)?;
    Ok(Json(
        services::progress_update::update(&state, user.user_id, parent, parent_id, id, &input)
            .await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(parent): Extension<UpdateParent>,
    user: AuthUser,
    Path((parent_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    services::progress_update::remove(&state, user.user_id, parent, parent_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
