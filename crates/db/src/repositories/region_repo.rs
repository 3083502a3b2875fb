//! Repository for the `regions` table.

use kindquest_core::types::DbId;
use sqlx::PgPool;

use crate::errors::log_db_error;
use crate::models::record_status::{RecordStatus, LIVE};
use crate::models::region::{CreateRegion, Region, UpdateRegion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, record_status, created_at, updated_at";

/// Provides CRUD operations for regions.
pub struct RegionRepo;

impl RegionRepo {
    /// Insert a new region, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateRegion) -> Result<Region, sqlx::Error> {
        let query = format!("INSERT INTO regions (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Region>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
            .inspect_err(|e| log_db_error("regions.create", &format!("name={}", input.name), e))
    }

    /// Find a live region by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Region>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM regions WHERE id = $1 AND {LIVE}");
        sqlx::query_as::<_, Region>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("regions.find_by_id", &format!("id={id}"), e))
    }

    /// Find a live region by exact name, optionally ignoring one id (for updates).
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Option<Region>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM regions
             WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2) AND {LIVE}"
        );
        sqlx::query_as::<_, Region>(&query)
            .bind(name)
            .bind(exclude_id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("regions.find_by_name", &format!("name={name}"), e))
    }

    /// List all live regions in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Region>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM regions WHERE {LIVE} ORDER BY id");
        sqlx::query_as::<_, Region>(&query)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("regions.list", "", e))
    }

    /// Which of `ids` belong to live regions.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!("SELECT id FROM regions WHERE id = ANY($1) AND {LIVE}");
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("regions.existing_ids", &format!("ids={ids:?}"), e))
    }

    /// Update a region. Only non-`None` fields in `input` are applied;
    /// `updated_at` always moves.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRegion,
    ) -> Result<Option<Region>, sqlx::Error> {
        let query = format!(
            "UPDATE regions SET
                name = COALESCE($2, name),
                updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Region>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("regions.update", &format!("id={id}"), e))
    }

    /// Soft-delete a region by id. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE regions SET record_status = $2, updated_at = NOW() WHERE id = $1 AND {LIVE}"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(RecordStatus::Deleted)
            .execute(pool)
            .await
            .inspect_err(|e| log_db_error("regions.soft_delete", &format!("id={id}"), e))?;
        Ok(result.rows_affected() > 0)
    }
}
