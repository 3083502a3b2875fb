//! Handlers for the `/regions` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kindquest_core::types::DbId;
use kindquest_db::models::region::{CreateRegion, Region, UpdateRegion};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::services;
use crate::state::AppState;
use crate::validation::validate_request;

/// POST /api/v1/regions
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    AppJson(input): AppJson<CreateRegion>,
) -> AppResult<(StatusCode, Json<Region>)> {
    validate_request(&input)?;
    let region = services::region::create(&state, &input).await?;
    Ok((StatusCode::CREATED, Json(region)))
}

/// GET /api/v1/regions
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Region>>> {
    Ok(Json(services::region::find_all(&state).await?))
}

/// GET /api/v1/regions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Region>> {
    Ok(Json(services::region::find_one(&state, id).await?))
}

/// PATCH /api/v1/regions/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateRegion>,
) -> AppResult<Json<Region>> {
    validate_request(&input)?;
    Ok(Json(services::region::update(&state, id, &input).await?))
}

/// DELETE /api/v1/regions/{id}
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    services::region::remove(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
