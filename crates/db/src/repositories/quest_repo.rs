//! Repository for the `quests` and `quest_categories` tables.

use kindquest_core::coordinates;
use kindquest_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::errors::log_db_error;
use crate::models::quest::{CreateQuest, Quest, QuestListParams, QuestStatus, UpdateQuest};
use crate::models::record_status::{live, RecordStatus, LIVE};

const COLUMNS: &str = "id, title, description, status, experience_reward, achievement_id, \
    owner_id, city_id, organization_type_id, steps, address, latitude, longitude, \
    started_at, ended_at, record_status, created_at, updated_at";

/// Provides CRUD operations for quests.
pub struct QuestRepo;

impl QuestRepo {
    /// Insert a new quest owned by `owner_id`. Status defaults to `active`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateQuest,
    ) -> Result<Quest, sqlx::Error> {
        let query = format!(
            "INSERT INTO quests (title, description, status, experience_reward, achievement_id,
                owner_id, city_id, organization_type_id, steps, address, latitude, longitude,
                started_at, ended_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.unwrap_or(QuestStatus::Active))
            .bind(input.experience_reward)
            .bind(input.achievement_id)
            .bind(owner_id)
            .bind(input.city_id)
            .bind(input.organization_type_id)
            .bind(Json(&input.steps))
            .bind(&input.address)
            .bind(coordinates::to_text_opt(input.latitude))
            .bind(coordinates::to_text_opt(input.longitude))
            .bind(input.started_at)
            .bind(input.ended_at)
            .fetch_one(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "quests.create",
                    &format!("title={} owner_id={owner_id}", input.title),
                    e,
                )
            })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quests WHERE id = $1 AND {LIVE}");
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("quests.find_by_id", &format!("id={id}"), e))
    }

    /// List live quests matching every provided filter.
    pub async fn list(pool: &PgPool, params: &QuestListParams) -> Result<Vec<Quest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quests q
             WHERE ($1::BIGINT IS NULL OR q.city_id = $1)
               AND ($2::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM quest_categories qc
                    WHERE qc.quest_id = q.id AND qc.category_id = $2))
               AND ($3::quest_status IS NULL OR q.status = $3)
               AND ($4::BIGINT IS NULL OR q.owner_id = $4)
               AND q.{LIVE}
             ORDER BY q.id"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(params.city_id)
            .bind(params.category_id)
            .bind(params.status)
            .bind(params.owner_id)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("quests.list", &format!("{params:?}"), e))
    }

    /// Live quests a user has joined, in join order.
    pub async fn list_joined_by(pool: &PgPool, user_id: DbId) -> Result<Vec<Quest>, sqlx::Error> {
        let query = format!(
            "SELECT q.id, q.title, q.description, q.status, q.experience_reward, q.achievement_id,
                    q.owner_id, q.city_id, q.organization_type_id, q.steps, q.address,
                    q.latitude, q.longitude, q.started_at, q.ended_at, q.record_status,
                    q.created_at, q.updated_at
             FROM quests q
             JOIN user_quests uq ON uq.quest_id = q.id
             WHERE uq.user_id = $1 AND {}
             ORDER BY uq.created_at, q.id",
            live("q")
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("quests.list_joined_by", &format!("user_id={user_id}"), e))
    }

    /// Update a quest. Only non-`None` fields in `input` are applied;
    /// categories are handled by [`QuestRepo::replace_categories`].
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuest,
    ) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!(
            "UPDATE quests SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                experience_reward = COALESCE($5, experience_reward),
                achievement_id = COALESCE($6, achievement_id),
                city_id = COALESCE($7, city_id),
                organization_type_id = COALESCE($8, organization_type_id),
                steps = COALESCE($9, steps),
                address = COALESCE($10, address),
                latitude = COALESCE($11, latitude),
                longitude = COALESCE($12, longitude),
                started_at = COALESCE($13, started_at),
                ended_at = COALESCE($14, ended_at),
                updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.experience_reward)
            .bind(input.achievement_id)
            .bind(input.city_id)
            .bind(input.organization_type_id)
            .bind(input.steps.as_ref().map(Json))
            .bind(&input.address)
            .bind(coordinates::to_text_opt(input.latitude))
            .bind(coordinates::to_text_opt(input.longitude))
            .bind(input.started_at)
            .bind(input.ended_at)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("quests.update", &format!("id={id}"), e))
    }

    /// Soft-delete a quest. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE quests SET record_status = $2, updated_at = NOW() WHERE id = $1 AND {LIVE}"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(RecordStatus::Deleted)
            .execute(pool)
            .await
            .inspect_err(|e| log_db_error("quests.soft_delete", &format!("id={id}"), e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Category ids linked to a quest.
    pub async fn category_ids(pool: &PgPool, quest_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT category_id FROM quest_categories WHERE quest_id = $1 ORDER BY category_id",
        )
        .bind(quest_id)
        .fetch_all(pool)
        .await
        .inspect_err(|e| log_db_error("quest_categories.list", &format!("quest_id={quest_id}"), e))
    }

    /// Replace a quest's category set in one transaction.
    pub async fn replace_categories(
        pool: &PgPool,
        quest_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let params = format!("quest_id={quest_id} ids={category_ids:?}");
        let mut tx = pool
            .begin()
            .await
            .inspect_err(|e| log_db_error("quest_categories.replace", &params, e))?;
        sqlx::query("DELETE FROM quest_categories WHERE quest_id = $1")
            .bind(quest_id)
            .execute(&mut *tx)
            .await
            .inspect_err(|e| log_db_error("quest_categories.replace", &params, e))?;
        sqlx::query(
            "INSERT INTO quest_categories (quest_id, category_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(quest_id)
        .bind(category_ids)
        .execute(&mut *tx)
        .await
        .inspect_err(|e| log_db_error("quest_categories.replace", &params, e))?;
        tx.commit()
            .await
            .inspect_err(|e| log_db_error("quest_categories.replace", &params, e))
    }
}
