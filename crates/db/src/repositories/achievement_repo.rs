//! Repository for the `achievements` and `user_achievements` tables.

use kindquest_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::errors::log_db_error;
use crate::models::achievement::{
    Achievement, AchievementRarity, CreateAchievement, ReceivedAchievement, UpdateAchievement,
    UserAchievement,
};
use crate::models::record_status::{live, RecordStatus, LIVE};

const COLUMNS: &str =
    "id, title, description, icon, rarity, quest_id, record_status, created_at, updated_at";

const LINK_COLUMNS: &str = "id, user_id, achievement_id, created_at";

/// Provides CRUD operations for achievements and their awards to users.
pub struct AchievementRepo;

impl AchievementRepo {
    /// Insert a new achievement. Rarity defaults to `common`.
    pub async fn create(pool: &PgPool, input: &CreateAchievement) -> Result<Achievement, sqlx::Error> {
        let query = format!(
            "INSERT INTO achievements (title, description, icon, rarity, quest_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.rarity.unwrap_or(AchievementRarity::Common))
            .bind(input.quest_id)
            .fetch_one(pool)
            .await
            .inspect_err(|e| log_db_error("achievements.create", &format!("title={}", input.title), e))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Achievement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM achievements WHERE id = $1 AND {LIVE}");
        sqlx::query_as::<_, Achievement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("achievements.find_by_id", &format!("id={id}"), e))
    }

    /// Find a live achievement by exact title, optionally ignoring one id.
    pub async fn find_by_title(
        pool: &PgPool,
        title: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Option<Achievement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM achievements
             WHERE title = $1 AND ($2::BIGINT IS NULL OR id <> $2) AND {LIVE}"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(title)
            .bind(exclude_id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("achievements.find_by_title", &format!("title={title}"), e))
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Achievement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM achievements WHERE {LIVE} ORDER BY id");
        sqlx::query_as::<_, Achievement>(&query)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("achievements.list", "", e))
    }

    /// Update an achievement. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAchievement,
    ) -> Result<Option<Achievement>, sqlx::Error> {
        let query = format!(
            "UPDATE achievements SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                icon = COALESCE($4, icon),
                rarity = COALESCE($5, rarity),
                quest_id = COALESCE($6, quest_id),
                updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.rarity)
            .bind(input.quest_id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("achievements.update", &format!("id={id}"), e))
    }

    /// Soft-delete an achievement. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE achievements SET record_status = $2, updated_at = NOW()
             WHERE id = $1 AND {LIVE}"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(RecordStatus::Deleted)
            .execute(pool)
            .await
            .inspect_err(|e| log_db_error("achievements.soft_delete", &format!("id={id}"), e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Record that a user received an achievement. A repeat award fails with
    /// a unique violation on `uq_user_achievements`.
    pub async fn assign(
        pool: &PgPool,
        user_id: DbId,
        achievement_id: DbId,
    ) -> Result<UserAchievement, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_achievements (user_id, achievement_id)
             VALUES ($1, $2)
             RETURNING {LINK_COLUMNS}"
        );
        sqlx::query_as::<_, UserAchievement>(&query)
            .bind(user_id)
            .bind(achievement_id)
            .fetch_one(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "user_achievements.assign",
                    &format!("user_id={user_id} achievement_id={achievement_id}"),
                    e,
                )
            })
    }

    /// Award an achievement unless the user already has it. Returns the new
    /// link row, or `None` if it already existed.
    pub async fn assign_if_absent<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
        achievement_id: DbId,
    ) -> Result<Option<UserAchievement>, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_achievements (user_id, achievement_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_user_achievements DO NOTHING
             RETURNING {LINK_COLUMNS}"
        );
        sqlx::query_as::<_, UserAchievement>(&query)
            .bind(user_id)
            .bind(achievement_id)
            .fetch_optional(db)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "user_achievements.assign_if_absent",
                    &format!("user_id={user_id} achievement_id={achievement_id}"),
                    e,
                )
            })
    }

    /// Live achievements a user has received, most recent first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ReceivedAchievement>, sqlx::Error> {
        let query = format!(
            "SELECT a.id, a.title, a.description, a.icon, a.rarity, a.quest_id,
                    a.record_status, a.created_at, a.updated_at,
                    ua.created_at AS received_at
             FROM achievements a
             JOIN user_achievements ua ON ua.achievement_id = a.id
             WHERE ua.user_id = $1 AND {}
             ORDER BY ua.created_at DESC, a.id",
            live("a")
        );
        sqlx::query_as::<_, ReceivedAchievement>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .inspect_err(|e| {
                log_db_error("user_achievements.list_for_user", &format!("user_id={user_id}"), e)
            })
    }
}
