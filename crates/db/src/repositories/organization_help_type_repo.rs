//! Repository for the `organization_help_types` join table.

use kindquest_core::types::DbId;
use sqlx::PgPool;

use crate::errors::log_db_error;
use crate::models::lookup::Lookup;
use crate::models::record_status::live;

/// Manages which kinds of help an organization accepts.
pub struct OrganizationHelpTypeRepo;

impl OrganizationHelpTypeRepo {
    /// Attach one help type. A duplicate pair fails with a unique violation on
    /// `uq_organization_help_types`.
    pub async fn add(
        pool: &PgPool,
        organization_id: DbId,
        help_type_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO organization_help_types (organization_id, help_type_id) VALUES ($1, $2)",
        )
        .bind(organization_id)
        .bind(help_type_id)
        .execute(pool)
        .await
        .inspect_err(|e| {
            log_db_error(
                "organization_help_types.add",
                &format!("organization_id={organization_id} help_type_id={help_type_id}"),
                e,
            )
        })?;
        Ok(())
    }

    /// Detach a help type. Returns `true` if the pair existed.
    pub async fn remove(
        pool: &PgPool,
        organization_id: DbId,
        help_type_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM organization_help_types WHERE organization_id = $1 AND help_type_id = $2",
        )
        .bind(organization_id)
        .bind(help_type_id)
        .execute(pool)
        .await
        .inspect_err(|e| {
            log_db_error(
                "organization_help_types.remove",
                &format!("organization_id={organization_id} help_type_id={help_type_id}"),
                e,
            )
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Live help types attached to an organization.
    pub async fn list_for_organization(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<Lookup>, sqlx::Error> {
        let query = format!(
            "SELECT t.id, t.name, t.record_status, t.created_at, t.updated_at
             FROM help_types t
             JOIN organization_help_types oh ON oh.help_type_id = t.id
             WHERE oh.organization_id = $1 AND {}
             ORDER BY t.id",
            live("t")
        );
        sqlx::query_as::<_, Lookup>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "organization_help_types.list_for_organization",
                    &format!("organization_id={organization_id}"),
                    e,
                )
            })
    }
}
