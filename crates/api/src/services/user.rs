use kindquest_core::types::DbId;
use kindquest_db::models::achievement::ReceivedAchievement;
use kindquest_db::models::quest::Quest;
use kindquest_db::models::user::{UpdateProfile, User};
use kindquest_db::repositories::{AchievementRepo, OrganizationRepo, QuestRepo, UserRepo};

use super::{found, removed};
use crate::error::AppResult;
use crate::state::AppState;

const ENTITY: &str = "User";

pub async fn find_one(state: &AppState, id: DbId) -> AppResult<User> {
    found(UserRepo::find_by_id(&state.pool, id).await?, ENTITY, id)
}

pub async fn update_profile(state: &AppState, id: DbId, input: &UpdateProfile) -> AppResult<User> {
    find_one(state, id).await?;
    if let Some(organisation_id) = input.organisation_id {
        found(
            OrganizationRepo::find_by_id(&state.pool, organisation_id).await?,
            "Organization",
            organisation_id,
        )?;
    }
    found(UserRepo::update_profile(&state.pool, id, input).await?, ENTITY, id)
}

pub async fn remove(state: &AppState, id: DbId) -> AppResult<()> {
    removed(UserRepo::soft_delete(&state.pool, id).await?, ENTITY, id)?;
    tracing::info!(user_id = id, "User deleted");
    Ok(())
}

pub async fn achievements(state: &AppState, id: DbId) -> AppResult<Vec<ReceivedAchievement>> {
    find_one(state, id).await?;
    Ok(AchievementRepo::list_for_user(&state.pool, id).await?)
}

pub async fn quests(state: &AppState, id: DbId) -> AppResult<Vec<Quest>> {
    find_one(state, id).await?;
    Ok(QuestRepo::list_joined_by(&state.pool, id).await?)
}
