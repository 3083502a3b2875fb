use kindquest_core::error::CoreError;
use kindquest_core::types::DbId;
use kindquest_db::models::achievement::{
    Achievement, CreateAchievement, UpdateAchievement, UserAchievement,
};
use kindquest_db::repositories::{AchievementRepo, QuestRepo, UserRepo};
use kindquest_events::event::ACHIEVEMENT_ASSIGNED;
use kindquest_events::QueueEvent;

use super::{found, removed};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const ENTITY: &str = "Achievement";

fn title_taken(title: &str) -> CoreError {
    CoreError::already_exists(ENTITY, "title", title)
}

async fn ensure_title_free(state: &AppState, title: &str, exclude_id: Option<DbId>) -> AppResult<()> {
    if AchievementRepo::find_by_title(&state.pool, title, exclude_id)
        .await?
        .is_some()
    {
        return Err(title_taken(title).into());
    }
    Ok(())
}

async fn ensure_quest(state: &AppState, quest_id: Option<DbId>) -> AppResult<()> {
    if let Some(quest_id) = quest_id {
        found(QuestRepo::find_by_id(&state.pool, quest_id).await?, "Quest", quest_id)?;
    }
    Ok(())
}

pub async fn create(state: &AppState, input: &CreateAchievement) -> AppResult<Achievement> {
    ensure_title_free(state, &input.title, None).await?;
    ensure_quest(state, input.quest_id).await?;
    let achievement = AchievementRepo::create(&state.pool, input)
        .await
        .map_err(|e| AppError::unique_or(e, title_taken(&input.title)))?;
    tracing::info!(achievement_id = achievement.id, "Achievement created");
    Ok(achievement)
}

pub async fn find_one(state: &AppState, id: DbId) -> AppResult<Achievement> {
    found(AchievementRepo::find_by_id(&state.pool, id).await?, ENTITY, id)
}

pub async fn find_all(state: &AppState) -> AppResult<Vec<Achievement>> {
    Ok(AchievementRepo::list(&state.pool).await?)
}

pub async fn update(state: &AppState, id: DbId, input: &UpdateAchievement) -> AppResult<Achievement> {
    find_one(state, id).await?;
    if let Some(title) = &input.title {
        ensure_title_free(state, title, Some(id)).await?;
    }
    ensure_quest(state, input.quest_id).await?;
    let updated = AchievementRepo::update(&state.pool, id, input)
        .await
        .map_err(|e| {
            AppError::unique_or(e, title_taken(input.title.as_deref().unwrap_or_default()))
        })?;
    found(updated, ENTITY, id)
}

pub async fn remove(state: &AppState, id: DbId) -> AppResult<()> {
    removed(AchievementRepo::soft_delete(&state.pool, id).await?, ENTITY, id)
}

/// Grant an achievement to a user. Granting it a second time is a `Conflict`.
pub async fn assign(state: &AppState, id: DbId, user_id: DbId) -> AppResult<UserAchievement> {
    let achievement = find_one(state, id).await?;
    found(UserRepo::find_by_id(&state.pool, user_id).await?, "User", user_id)?;

    let granted = AchievementRepo::assign(&state.pool, user_id, id)
        .await
        .map_err(|e| {
            AppError::unique_or(
                e,
                CoreError::Conflict(format!(
                    "User {user_id} already has achievement '{}'",
                    achievement.title
                )),
            )
        })?;

    tracing::info!(achievement_id = id, user_id, "Achievement assigned");
    publish_assigned(state, &granted);
    Ok(granted)
}

/// Emit `achievement.assigned` for a grant. Publishing is best effort.
pub(crate) fn publish_assigned(state: &AppState, granted: &UserAchievement) {
    let event = QueueEvent::new(ACHIEVEMENT_ASSIGNED)
        .with_entity("achievement", granted.achievement_id)
        .with_user(granted.user_id);
    let queued = state.queue.publish_event(&event);
    tracing::debug!(queued, event_type = ACHIEVEMENT_ASSIGNED, "Event published");
}
