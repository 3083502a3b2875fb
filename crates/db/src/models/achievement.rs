//! Achievement entity model and DTOs.

use kindquest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::record_status::RecordStatus;

/// How rare an achievement is. `Private` achievements are only handed out
/// manually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "achievement_rarity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AchievementRarity {
    Common,
    Epic,
    Rare,
    Legendary,
    Private,
}

/// An achievement row from the `achievements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub rarity: AchievementRarity,
    pub quest_id: Option<DbId>,
    pub record_status: RecordStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an achievement.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAchievement {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub icon: Option<String>,
    /// Defaults to `common` if omitted.
    pub rarity: Option<AchievementRarity>,
    pub quest_id: Option<DbId>,
}

/// DTO for updating an achievement. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAchievement {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub icon: Option<String>,
    pub rarity: Option<AchievementRarity>,
    pub quest_id: Option<DbId>,
}

/// A row from `user_achievements`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAchievement {
    pub id: DbId,
    pub user_id: DbId,
    pub achievement_id: DbId,
    pub created_at: Timestamp,
}

/// An achievement together with the time the user received it.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedAchievement {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub achievement: Achievement,
    pub received_at: Timestamp,
}
