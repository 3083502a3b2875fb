//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kindquest_core::types::DbId;
use kindquest_db::models::achievement::ReceivedAchievement;
use kindquest_db::models::quest::Quest;
use kindquest_db::models::user::{UpdateProfile, User};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::services;
use crate::state::AppState;
use crate::validation::validate_request;

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<User>> {
    Ok(Json(services::user::find_one(&state, id).await?))
}

/// PATCH /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<UpdateProfile>,
) -> AppResult<Json<User>> {
    validate_request(&input)?;
    Ok(Json(
        services::user::update_profile(&state, user.user_id, &input).await?,
    ))
}

/// DELETE /api/v1/users/me
pub async fn delete_me(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    services::user::remove(&state, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/{id}/achievements
pub async fn achievements(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<ReceivedAchievement>>> {
    Ok(Json(services::user::achievements(&state, id).await?))
}

/// GET /api/v1/users/{id}/quests
pub async fn quests(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Quest>>> {
    Ok(Json(services::user::quests(&state, id).await?))
}
