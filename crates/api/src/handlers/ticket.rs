//! Handlers for the `/tickets` resource. Every route requires a token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kindquest_core::types::DbId;
use kindquest_db::models::ticket::{CreateTicket, Ticket};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::services;
use crate::state::AppState;
use crate::validation::validate_request;

/// POST /api/v1/tickets
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<CreateTicket>,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    validate_request(&input)?;
    let ticket = services::ticket::create(&state, &user, &input).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/v1/tickets
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Ticket>>> {
    Ok(Json(services::ticket::find_all(&state, &user).await?))
}

/// GET /api/v1/tickets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Ticket>> {
    Ok(Json(services::ticket::find_one(&state, &user, id).await?))
}

/// PATCH /api/v1/tickets/{id}/resolve
pub async fn resolve(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Ticket>> {
    Ok(Json(services::ticket::resolve(&state, &user, id).await?))
}

/// DELETE /api/v1/tickets/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    services::ticket::remove(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
