//! Repository for `quest_updates` and `organization_updates`.
//!
//! Every query is scoped by parent id so a post can only be reached through
//! the quest or organization it belongs to.

use kindquest_core::types::DbId;
use sqlx::PgPool;

use crate::errors::log_db_error;
use crate::models::progress_update::{
    CreateProgressUpdate, ProgressUpdate, UpdateParent, UpdateProgressUpdate,
};
use crate::models::record_status::{RecordStatus, LIVE};

fn columns(parent: UpdateParent) -> String {
    format!(
        "id, {} AS parent_id, title, text, photos, record_status, created_at, updated_at",
        parent.parent_column()
    )
}

/// Provides CRUD operations for progress posts.
pub struct ProgressUpdateRepo;

impl ProgressUpdateRepo {
    pub async fn create(
        pool: &PgPool,
        parent: UpdateParent,
        parent_id: DbId,
        input: &CreateProgressUpdate,
    ) -> Result<ProgressUpdate, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} ({parent_col}, title, text, photos)
             VALUES ($1, $2, $3, $4)
             RETURNING {cols}",
            table = parent.table(),
            parent_col = parent.parent_column(),
            cols = columns(parent),
        );
        sqlx::query_as::<_, ProgressUpdate>(&query)
            .bind(parent_id)
            .bind(&input.title)
            .bind(&input.text)
            .bind(&input.photos)
            .fetch_one(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "progress_updates.create",
                    &format!("table={} parent_id={parent_id}", parent.table()),
                    e,
                )
            })
    }

    pub async fn find_by_id(
        pool: &PgPool,
        parent: UpdateParent,
        parent_id: DbId,
        id: DbId,
    ) -> Result<Option<ProgressUpdate>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM {table} WHERE id = $1 AND {parent_col} = $2 AND {LIVE}",
            table = parent.table(),
            parent_col = parent.parent_column(),
            cols = columns(parent),
        );
        sqlx::query_as::<_, ProgressUpdate>(&query)
            .bind(id)
            .bind(parent_id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "progress_updates.find_by_id",
                    &format!("table={} parent_id={parent_id} id={id}", parent.table()),
                    e,
                )
            })
    }

    /// Live posts of one parent, newest first.
    pub async fn list(
        pool: &PgPool,
        parent: UpdateParent,
        parent_id: DbId,
    ) -> Result<Vec<ProgressUpdate>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM {table} WHERE {parent_col} = $1 AND {LIVE}
             ORDER BY created_at DESC, id DESC",
            table = parent.table(),
            parent_col = parent.parent_column(),
            cols = columns(parent),
        );
        sqlx::query_as::<_, ProgressUpdate>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "progress_updates.list",
                    &format!("table={} parent_id={parent_id}", parent.table()),
                    e,
                )
            })
    }

    /// Edit a post. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        parent: UpdateParent,
        parent_id: DbId,
        id: DbId,
        input: &UpdateProgressUpdate,
    ) -> Result<Option<ProgressUpdate>, sqlx::Error> {
        let query = format!(
            "UPDATE {table} SET
                title = COALESCE($3, title),
                text = COALESCE($4, text),
                photos = COALESCE($5, photos),
                updated_at = NOW()
             WHERE id = $1 AND {parent_col} = $2 AND {LIVE}
             RETURNING {cols}",
            table = parent.table(),
            parent_col = parent.parent_column(),
            cols = columns(parent),
        );
        sqlx::query_as::<_, ProgressUpdate>(&query)
            .bind(id)
            .bind(parent_id)
            .bind(&input.title)
            .bind(&input.text)
            .bind(&input.photos)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "progress_updates.update",
                    &format!("table={} parent_id={parent_id} id={id}", parent.table()),
                    e,
                )
            })
    }

    /// Soft-delete a post. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        parent: UpdateParent,
        parent_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {table} SET record_status = $3, updated_at = NOW()
             WHERE id = $1 AND {parent_col} = $2 AND {LIVE}",
            table = parent.table(),
            parent_col = parent.parent_column(),
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(parent_id)
            .bind(RecordStatus::Deleted)
            .execute(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "progress_updates.soft_delete",
                    &format!("table={} parent_id={parent_id} id={id}", parent.table()),
                    e,
                )
            })?;
        Ok(result.rows_affected() > 0)
    }
}
