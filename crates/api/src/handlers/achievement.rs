//! Handlers for the `/achievements` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kindquest_core::types::DbId;
use kindquest_db::models::achievement::{
    Achievement, CreateAchievement, UpdateAchievement, UserAchievement,
};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::services;
use crate::state::AppState;
use crate::validation::validate_request;

/// POST /api/v1/achievements
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    AppJson(input): AppJson<CreateAchievement>,
) -> AppResult<(StatusCode, Json<Achievement>)> {
    validate_request(&input)?;
    let achievement = services::achievement::create(&state, &input).await?;
    Ok((StatusCode::CREATED, Json(achievement)))
}

/// GET /api/v1/achievements
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Achievement>>> {
    Ok(Json(services::achievement::find_all(&state).await?))
}

/// GET /api/v1/achievements/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Achievement>> {
    Ok(Json(services::achievement::find_one(&state, id).await?))
}

/// PATCH /api/v1/achievements/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateAchievement>,
) -> AppResult<Json<Achievement>> {
    validate_request(&input)?;
    Ok(Json(services::achievement::update(&state, id, &input).await?))
}

/// DELETE /api/v1/achievements/{id}
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    services::achievement::remove(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/achievements/{id}/assign/{user_id}
pub async fn assign(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<(StatusCode, Json<UserAchievement>)> {
    let granted = services::achievement::assign(&state, id, user_id).await?;
    Ok((StatusCode::CREATED, Json(granted)))
}
