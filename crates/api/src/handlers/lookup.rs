//! Handlers shared by organization types, help types and categories.
//!
//! The route tree attaches the [`LookupKind`] as a request extension, so one
//! set of handlers serves all three tables.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use kindquest_core::types::DbId;
use kindquest_db::models::lookup::{CreateLookup, Lookup, LookupKind, UpdateLookup};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::services;
use crate::state::AppState;
use crate::validation::{validate_batch, validate_request};

/// POST /api/v1/{organization-types|help-types|categories}
pub async fn create(
    State(state): State<AppState>,
    Extension(kind): Extension<LookupKind>,
    _user: AuthUser,
    AppJson(input): AppJson<CreateLookup>,
) -> AppResult<(StatusCode, Json<Lookup>)> {
    validate_request(&input)?;
    let row = services::lookup::create(&state, kind, &input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// POST /api/v2/categories
pub async fn create_bulk(
    State(state): State<AppState>,
    Extension(kind): Extension<LookupKind>,
    RequireAdmin(_admin): RequireAdmin,
    AppJson(input): AppJson<Vec<CreateLookup>>,
) -> AppResult<(StatusCode, Json<Vec<Lookup>>)> {
    validate_batch(&input)?;
    let rows = services::lookup::create_many(&state, kind, &input).await?;
    Ok((StatusCode::CREATED, Json(rows)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(kind): Extension<LookupKind>,
) -> AppResult<Json<Vec<Lookup>>> {
    Ok(Json(services::lookup::find_all(&state, kind).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(kind): Extension<LookupKind>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Lookup>> {
    Ok(Json(services::lookup::find_one(&state, kind, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(kind): Extension<LookupKind>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateLookup>,
) -> AppResult<Json<Lookup>> {
    validate_request(&input)?;
    Ok(Json(services::lookup::update(&state, kind, id, &input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(kind): Extension<LookupKind>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    services::lookup::remove(&state, kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
