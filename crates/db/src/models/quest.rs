//! Quest entity model and DTOs.

use kindquest_core::coordinates;
use kindquest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use crate::models::record_status::RecordStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "quest_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    Active,
    Completed,
    Archived,
}

/// One step of a quest's checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QuestStep {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// A quest row from the `quests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: QuestStatus,
    pub experience_reward: i32,
    pub achievement_id: Option<DbId>,
    pub owner_id: DbId,
    pub city_id: DbId,
    pub organization_type_id: Option<DbId>,
    pub steps: Json<Vec<QuestStep>>,
    pub address: Option<String>,
    #[serde(serialize_with = "coordinates::serialize_opt")]
    pub latitude: Option<String>,
    #[serde(serialize_with = "coordinates::serialize_opt")]
    pub longitude: Option<String>,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    pub record_status: RecordStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a quest. The owner is the authenticated user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    /// Defaults to `active` if omitted.
    pub status: Option<QuestStatus>,
    #[serde(default)]
    #[validate(range(min = 0, max = 100000))]
    pub experience_reward: i32,
    pub achievement_id: Option<DbId>,
    pub city_id: DbId,
    pub organization_type_id: Option<DbId>,
    #[serde(default)]
    #[validate(nested)]
    pub steps: Vec<QuestStep>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    #[serde(default)]
    pub category_ids: Vec<DbId>,
}

/// DTO for updating a quest. All fields are optional; `category_ids`, when
/// present, replaces the quest's category set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    pub status: Option<QuestStatus>,
    #[validate(range(min = 0, max = 100000))]
    pub experience_reward: Option<i32>,
    pub achievement_id: Option<DbId>,
    pub city_id: Option<DbId>,
    pub organization_type_id: Option<DbId>,
    #[validate(nested)]
    pub steps: Option<Vec<QuestStep>>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    pub category_ids: Option<Vec<DbId>>,
}

/// Query parameters for `GET /quests`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestListParams {
    pub city_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub status: Option<QuestStatus>,
    pub owner_id: Option<DbId>,
}

/// A quest with its categories and participant count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestDetail {
    #[serde(flatten)]
    pub quest: Quest,
    pub category_ids: Vec<DbId>,
    pub participant_count: i64,
}

/// A row from `user_quests`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuest {
    pub id: DbId,
    pub user_id: DbId,
    pub quest_id: DbId,
    pub is_completed: bool,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
