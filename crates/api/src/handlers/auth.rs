//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use kindquest_db::models::user::{LoginRequest, RegisterRequest, User};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::services;
use crate::services::auth::AuthResponse;
use crate::state::AppState;
use crate::validation::validate_request;

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_request(&input)?;
    let response = services::auth::register(&state, &input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_request(&input)?;
    Ok(Json(services::auth::login(&state, &input).await?))
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<User>> {
    Ok(Json(services::user::find_one(&state, user.user_id).await?))
}
