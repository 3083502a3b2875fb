//! Handlers for the `/cities` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kindquest_core::types::DbId;
use kindquest_db::models::city::{City, CityListParams, CreateCity, UpdateCity};

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::services;
use crate::state::AppState;
use crate::validation::{validate_batch, validate_request};

/// POST /api/v1/cities
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    AppJson(input): AppJson<CreateCity>,
) -> AppResult<(StatusCode, Json<City>)> {
    validate_request(&input)?;
    let city = services::city::create(&state, &input).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

/// POST /api/v1/cities/bulk
pub async fn create_bulk(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppJson(input): AppJson<Vec<CreateCity>>,
) -> AppResult<(StatusCode, Json<Vec<City>>)> {
    validate_batch(&input)?;
    let cities = services::city::create_many(&state, &input).await?;
    Ok((StatusCode::CREATED, Json(cities)))
}

/// GET /api/v1/cities?regionId=
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<CityListParams>,
) -> AppResult<Json<Vec<City>>> {
    Ok(Json(services::city::find_all(&state, params.region_id).await?))
}

/// GET /api/v1/cities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<City>> {
    Ok(Json(services::city::find_one(&state, id).await?))
}

/// PATCH /api/v1/cities/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateCity>,
) -> AppResult<Json<City>> {
    validate_request(&input)?;
    Ok(Json(services::city::update(&state, id, &input).await?))
}

/// DELETE /api/v1/cities/{id}
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    services::city::remove(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
