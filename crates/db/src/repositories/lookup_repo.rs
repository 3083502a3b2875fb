//! Repository for the `{id, name}` lookup tables: organization types, help
//! types and categories. Every method takes the [`LookupKind`] to act on.

use kindquest_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::errors::log_db_error;
use crate::models::lookup::{CreateLookup, Lookup, LookupKind, UpdateLookup};
use crate::models::record_status::{RecordStatus, LIVE};

const COLUMNS: &str = "id, name, record_status, created_at, updated_at";

/// Provides CRUD operations for lookup rows.
pub struct LookupRepo;

impl LookupRepo {
    /// Insert a new lookup row, returning it.
    pub async fn create(
        pool: &PgPool,
        kind: LookupKind,
        input: &CreateLookup,
    ) -> Result<Lookup, sqlx::Error> {
        let table = kind.table();
        let query = format!("INSERT INTO {table} (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Lookup>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
            .inspect_err(|e| log_db_error("lookups.create", &format!("table={table} name={}", input.name), e))
    }

    /// Insert a batch of lookup rows in one statement.
    pub async fn create_many(
        pool: &PgPool,
        kind: LookupKind,
        items: &[CreateLookup],
    ) -> Result<Vec<Lookup>, sqlx::Error> {
        let table = kind.table();
        let mut builder = QueryBuilder::<Postgres>::new(format!("INSERT INTO {table} (name) "));
        builder.push_values(items, |mut row, item| {
            row.push_bind(&item.name);
        });
        builder.push(format!(" RETURNING {COLUMNS}"));
        builder
            .build_query_as::<Lookup>()
            .fetch_all(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "lookups.create_many",
                    &format!("table={table} count={}", items.len()),
                    e,
                )
            })
    }

    /// Find a live lookup row by id.
    pub async fn find_by_id(
        pool: &PgPool,
        kind: LookupKind,
        id: DbId,
    ) -> Result<Option<Lookup>, sqlx::Error> {
        let table = kind.table();
        let query = format!("SELECT {COLUMNS} FROM {table} WHERE id = $1 AND {LIVE}");
        sqlx::query_as::<_, Lookup>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("lookups.find_by_id", &format!("table={table} id={id}"), e))
    }

    /// Find a live lookup row by exact name, optionally ignoring one id.
    pub async fn find_by_name(
        pool: &PgPool,
        kind: LookupKind,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Option<Lookup>, sqlx::Error> {
        let table = kind.table();
        let query = format!(
            "SELECT {COLUMNS} FROM {table}
             WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2) AND {LIVE}"
        );
        sqlx::query_as::<_, Lookup>(&query)
            .bind(name)
            .bind(exclude_id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("lookups.find_by_name", &format!("table={table} name={name}"), e))
    }

    /// Of the given names, return those already used by live rows.
    pub async fn existing_names(
        pool: &PgPool,
        kind: LookupKind,
        names: &[String],
    ) -> Result<Vec<String>, sqlx::Error> {
        let table = kind.table();
        let query = format!("SELECT name FROM {table} WHERE name = ANY($1) AND {LIVE}");
        sqlx::query_scalar::<_, String>(&query)
            .bind(names)
            .fetch_all(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "lookups.existing_names",
                    &format!("table={table} count={}", names.len()),
                    e,
                )
            })
    }

    /// Which of `ids` belong to live rows.
    pub async fn existing_ids(
        pool: &PgPool,
        kind: LookupKind,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let table = kind.table();
        let query = format!("SELECT id FROM {table} WHERE id = ANY($1) AND {LIVE}");
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("lookups.existing_ids", &format!("table={table} ids={ids:?}"), e))
    }

    /// List live rows of one kind in insertion order.
    pub async fn list(pool: &PgPool, kind: LookupKind) -> Result<Vec<Lookup>, sqlx::Error> {
        let table = kind.table();
        let query = format!("SELECT {COLUMNS} FROM {table} WHERE {LIVE} ORDER BY id");
        sqlx::query_as::<_, Lookup>(&query)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("lookups.list", &format!("table={table}"), e))
    }

    /// Rename a lookup row. Returns `None` if no live row with `id` exists.
    pub async fn update(
        pool: &PgPool,
        kind: LookupKind,
        id: DbId,
        input: &UpdateLookup,
    ) -> Result<Option<Lookup>, sqlx::Error> {
        let table = kind.table();
        let query = format!(
            "UPDATE {table} SET
                name = COALESCE($2, name),
                updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lookup>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("lookups.update", &format!("table={table} id={id}"), e))
    }

    /// Soft-delete a lookup row. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, kind: LookupKind, id: DbId) -> Result<bool, sqlx::Error> {
        let table = kind.table();
        let query = format!(
            "UPDATE {table} SET record_status = $2, updated_at = NOW() WHERE id = $1 AND {LIVE}"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(RecordStatus::Deleted)
            .execute(pool)
            .await
            .inspect_err(|e| log_db_error("lookups.soft_delete", &format!("table={table} id={id}"), e))?;
        Ok(result.rows_affected() > 0)
    }
}
