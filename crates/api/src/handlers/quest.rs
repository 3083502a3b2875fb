//! Handlers for the `/quests` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kindquest_core::types::DbId;
use kindquest_db::models::quest::{
    CreateQuest, Quest, QuestDetail, QuestListParams, UpdateQuest, UserQuest,
};

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::services;
use crate::services::quest::QuestCompletion;
use crate::state::AppState;
use crate::validation::validate_request;

/// POST /api/v1/quests
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<CreateQuest>,
) -> AppResult<(StatusCode, Json<QuestDetail>)> {
    validate_request(&input)?;
    let quest = services::quest::create(&state, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(quest)))
}

/// GET /api/v1/quests?cityId=&categoryId=&status=&ownerId=
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<QuestListParams>,
) -> AppResult<Json<Vec<Quest>>> {
    Ok(Json(services::quest::find_all(&state, &params).await?))
}

/// GET /api/v1/quests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<QuestDetail>> {
    Ok(Json(services::quest::find_one(&state, id).await?))
}

/// PATCH /api/v1/quests/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateQuest>,
) -> AppResult<Json<QuestDetail>> {
    validate_request(&input)?;
    Ok(Json(
        services::quest::update(&state, user.user_id, id, &input).await?,
    ))
}

/// DELETE /api/v1/quests/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    services::quest::remove(&state, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/quests/{id}/join
pub async fn join(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<UserQuest>)> {
    let participation = services::quest::join(&state, user.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(participation)))
}

/// POST /api/v1/quests/{id}/participants/{user_id}/complete
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, participant_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<QuestCompletion>> {
    Ok(Json(
        services::quest::complete(&state, user.user_id, id, participant_id).await?,
    ))
}
