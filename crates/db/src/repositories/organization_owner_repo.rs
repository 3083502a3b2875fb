//! Repository for the `organization_owners` join table.

use kindquest_core::types::DbId;
use sqlx::PgPool;

use crate::errors::log_db_error;

/// Manages which users own which organizations.
pub struct OrganizationOwnerRepo;

impl OrganizationOwnerRepo {
    /// Whether `user_id` is an owner of `organization_id`.
    pub async fn is_owner(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM organization_owners
                WHERE organization_id = $1 AND user_id = $2)",
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .inspect_err(|e| {
            log_db_error(
                "organization_owners.is_owner",
                &format!("organization_id={organization_id} user_id={user_id}"),
                e,
            )
        })
    }

    /// Add an owner. A duplicate pair fails with a unique violation on
    /// `uq_organization_owners`.
    pub async fn add(pool: &PgPool, organization_id: DbId, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO organization_owners (organization_id, user_id) VALUES ($1, $2)")
            .bind(organization_id)
            .bind(user_id)
            .execute(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "organization_owners.add",
                    &format!("organization_id={organization_id} user_id={user_id}"),
                    e,
                )
            })?;
        Ok(())
    }

    /// Remove an owner. Returns `true` if the pair existed.
    pub async fn remove(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM organization_owners WHERE organization_id = $1 AND user_id = $2")
                .bind(organization_id)
                .bind(user_id)
                .execute(pool)
                .await
                .inspect_err(|e| {
                    log_db_error(
                        "organization_owners.remove",
                        &format!("organization_id={organization_id} user_id={user_id}"),
                        e,
                    )
                })?;
        Ok(result.rows_affected() > 0)
    }

    /// Owner user ids in the order they were added.
    pub async fn list_user_ids(pool: &PgPool, organization_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT user_id FROM organization_owners
             WHERE organization_id = $1
             ORDER BY created_at, user_id",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
        .inspect_err(|e| {
            log_db_error(
                "organization_owners.list_user_ids",
                &format!("organization_id={organization_id}"),
                e,
            )
        })
    }

    pub async fn count(pool: &PgPool, organization_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM organization_owners WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_one(pool)
        .await
        .inspect_err(|e| {
            log_db_error(
                "organization_owners.count",
                &format!("organization_id={organization_id}"),
                e,
            )
        })
    }
}
