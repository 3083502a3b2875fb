//! Repository for the `user_quests` participation table.

use kindquest_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::errors::log_db_error;
use crate::models::quest::UserQuest;

const COLUMNS: &str = "id, user_id, quest_id, is_completed, completed_at, created_at";

/// Tracks which users joined which quests and whether they finished.
pub struct UserQuestRepo;

impl UserQuestRepo {
    /// Join a quest. A second join fails with a unique violation on
    /// `uq_user_quests`.
    pub async fn join(pool: &PgPool, user_id: DbId, quest_id: DbId) -> Result<UserQuest, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_quests (user_id, quest_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserQuest>(&query)
            .bind(user_id)
            .bind(quest_id)
            .fetch_one(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "user_quests.join",
                    &format!("user_id={user_id} quest_id={quest_id}"),
                    e,
                )
            })
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        quest_id: DbId,
    ) -> Result<Option<UserQuest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_quests WHERE user_id = $1 AND quest_id = $2");
        sqlx::query_as::<_, UserQuest>(&query)
            .bind(user_id)
            .bind(quest_id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "user_quests.find",
                    &format!("user_id={user_id} quest_id={quest_id}"),
                    e,
                )
            })
    }

    /// Mark a participation completed. Returns `None` if the user never joined
    /// or was already completed, so a reward can only follow one transition.
    pub async fn complete<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
        quest_id: DbId,
    ) -> Result<Option<UserQuest>, sqlx::Error> {
        let query = format!(
            "UPDATE user_quests SET is_completed = TRUE, completed_at = NOW()
             WHERE user_id = $1 AND quest_id = $2 AND is_completed = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserQuest>(&query)
            .bind(user_id)
            .bind(quest_id)
            .fetch_optional(db)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "user_quests.complete",
                    &format!("user_id={user_id} quest_id={quest_id}"),
                    e,
                )
            })
    }

    pub async fn count_for_quest(pool: &PgPool, quest_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_quests WHERE quest_id = $1")
            .bind(quest_id)
            .fetch_one(pool)
            .await
            .inspect_err(|e| {
                log_db_error("user_quests.count_for_quest", &format!("quest_id={quest_id}"), e)
            })
    }
}
