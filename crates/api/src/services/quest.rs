//! Quests, participation and completion rewards.

use kindquest_core::error::CoreError;
use kindquest_core::experience;
use kindquest_core::types::DbId;
use kindquest_db::models::lookup::LookupKind;
use kindquest_db::models::quest::{
    CreateQuest, Quest, QuestDetail, QuestListParams, UpdateQuest, UserQuest,
};
use kindquest_db::repositories::{AchievementRepo, CityRepo, QuestRepo, UserQuestRepo, UserRepo};
use kindquest_events::event::QUEST_COMPLETED;
use kindquest_events::QueueEvent;
use serde::Serialize;
use serde_json::json;

use super::{achievement, forbidden, found, lookup, removed};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const ENTITY: &str = "Quest";

/// Result of confirming a participant's completion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestCompletion {
    pub participation: UserQuest,
    pub experience: i32,
    pub level: i32,
    /// Set when the quest's achievement was newly granted.
    pub achievement_id: Option<DbId>,
}

async fn load(state: &AppState, id: DbId) -> AppResult<Quest> {
    found(QuestRepo::find_by_id(&state.pool, id).await?, ENTITY, id)
}

/// Load a quest and fail with `Forbidden` unless `user_id` owns it.
pub(crate) async fn load_owned(state: &AppState, id: DbId, user_id: DbId) -> AppResult<Quest> {
    let quest = load(state, id).await?;
    if quest.owner_id != user_id {
        return Err(forbidden("Only the quest owner may do this"));
    }
    Ok(quest)
}

/// Check every referenced row that is present in a create or patch.
async fn ensure_references(
    state: &AppState,
    city_id: Option<DbId>,
    organization_type_id: Option<DbId>,
    achievement_id: Option<DbId>,
    category_ids: &[DbId],
) -> AppResult<()> {
    if let Some(city_id) = city_id {
        found(CityRepo::find_by_id(&state.pool, city_id).await?, "City", city_id)?;
    }
    if let Some(type_id) = organization_type_id {
        lookup::find_one(state, LookupKind::OrganizationType, type_id).await?;
    }
    if let Some(achievement_id) = achievement_id {
        found(
            AchievementRepo::find_by_id(&state.pool, achievement_id).await?,
            "Achievement",
            achievement_id,
        )?;
    }
    lookup::ensure_all_exist(state, LookupKind::Category, category_ids).await
}

async fn detail(state: &AppState, quest: Quest) -> AppResult<QuestDetail> {
    let category_ids = QuestRepo::category_ids(&state.pool, quest.id).await?;
    let participant_count = UserQuestRepo::count_for_quest(&state.pool, quest.id).await?;
    Ok(QuestDetail {
        quest,
        category_ids,
        participant_count,
    })
}

pub async fn create(state: &AppState, owner_id: DbId, input: &CreateQuest) -> AppResult<QuestDetail> {
    ensure_references(
        state,
        Some(input.city_id),
        input.organization_type_id,
        input.achievement_id,
        &input.category_ids,
    )
    .await?;

    let quest = QuestRepo::create(&state.pool, owner_id, input).await?;
    if !input.category_ids.is_empty() {
        QuestRepo::replace_categories(&state.pool, quest.id, &input.category_ids).await?;
    }

    tracing::info!(quest_id = quest.id, owner_id, "Quest created");
    detail(state, quest).await
}

pub async fn find_one(state: &AppState, id: DbId) -> AppResult<QuestDetail> {
    let quest = load(state, id).await?;
    detail(state, quest).await
}

pub async fn find_all(state: &AppState, params: &QuestListParams) -> AppResult<Vec<Quest>> {
    Ok(QuestRepo::list(&state.pool, params).await?)
}

pub async fn update(
    state: &AppState,
    user_id: DbId,
    id: DbId,
    input: &UpdateQuest,
) -> AppResult<QuestDetail> {
    load_owned(state, id, user_id).await?;
    ensure_references(
        state,
        input.city_id,
        input.organization_type_id,
        input.achievement_id,
        input.category_ids.as_deref().unwrap_or_default(),
    )
    .await?;

    let quest = found(QuestRepo::update(&state.pool, id, input).await?, ENTITY, id)?;
    if let Some(category_ids) = &input.category_ids {
        QuestRepo::replace_categories(&state.pool, id, category_ids).await?;
    }
    detail(state, quest).await
}

pub async fn remove(state: &AppState, user_id: DbId, id: DbId) -> AppResult<()> {
    load_owned(state, id, user_id).await?;
    removed(QuestRepo::soft_delete(&state.pool, id).await?, ENTITY, id)?;
    tracing::info!(quest_id = id, user_id, "Quest deleted");
    Ok(())
}

pub async fn join(state: &AppState, user_id: DbId, id: DbId) -> AppResult<UserQuest> {
    load(state, id).await?;

    let already = || CoreError::Conflict(format!("User {user_id} already joined quest {id}"));
    if UserQuestRepo::find(&state.pool, user_id, id).await?.is_some() {
        return Err(already().into());
    }
    let participation = UserQuestRepo::join(&state.pool, user_id, id)
        .await
        .map_err(|e| AppError::unique_or(e, already()))?;

    tracing::info!(quest_id = id, user_id, "Quest joined");
    Ok(participation)
}

/// Confirm that `participant_id` completed the quest.
///
/// Only the quest owner may confirm. Experience is awarded once per
/// participation because the completion update only matches rows that are
/// not yet completed.
pub async fn complete(
    state: &AppState,
    owner_id: DbId,
    id: DbId,
    participant_id: DbId,
) -> AppResult<QuestCompletion> {
    let quest = load_owned(state, id, owner_id).await?;

    let participation = found(
        UserQuestRepo::find(&state.pool, participant_id, id).await?,
        "QuestParticipant",
        participant_id,
    )?;
    let already_done = || {
        AppError::Core(CoreError::Conflict(format!(
            "User {participant_id} already completed quest {id}"
        )))
    };
    if participation.is_completed {
        return Err(already_done());
    }
    // A failed award rolls back and leaves the participation open.
    let mut tx = state.pool.begin().await?;
    let participation = UserQuestRepo::complete(&mut *tx, participant_id, id)
        .await?
        .ok_or_else(already_done)?;

    let experience = found(
        UserRepo::add_experience(&mut *tx, participant_id, quest.experience_reward).await?,
        "User",
        participant_id,
    )?;
    let user = found(
        UserRepo::raise_level(
            &mut *tx,
            participant_id,
            experience::level_for_experience(experience),
        )
        .await?,
        "User",
        participant_id,
    )?;

    let granted = match quest.achievement_id {
        Some(achievement_id) => {
            AchievementRepo::assign_if_absent(&mut *tx, participant_id, achievement_id).await?
        }
        None => None,
    };
    tx.commit().await?;

    let granted_achievement = granted.map(|link| {
        achievement::publish_assigned(state, &link);
        link.achievement_id
    });

    let event = QueueEvent::new(QUEST_COMPLETED)
        .with_entity("quest", id)
        .with_user(participant_id)
        .with_payload(json!({
            "experienceReward": quest.experience_reward,
            "experience": user.experience,
            "level": user.level,
        }));
    let queued = state.queue.publish_event(&event);
    tracing::info!(
        quest_id = id,
        user_id = participant_id,
        experience = user.experience,
        level = user.level,
        queued,
        "Quest completed"
    );

    Ok(QuestCompletion {
        participation,
        experience: user.experience,
        level: user.level,
        achievement_id: granted_achievement,
    })
}
