//! Repository for the `cities` table.

use kindquest_core::coordinates;
use kindquest_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::errors::log_db_error;
use crate::models::city::{City, CreateCity, UpdateCity};
use crate::models::record_status::{RecordStatus, LIVE};

const COLUMNS: &str =
    "id, name, latitude, longitude, region_id, record_status, created_at, updated_at";

/// Provides CRUD operations for cities.
pub struct CityRepo;

impl CityRepo {
    /// Insert a new city, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCity) -> Result<City, sqlx::Error> {
        let query = format!(
            "INSERT INTO cities (name, latitude, longitude, region_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(&input.name)
            .bind(coordinates::to_text(input.latitude))
            .bind(coordinates::to_text(input.longitude))
            .bind(input.region_id)
            .fetch_one(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "cities.create",
                    &format!("name={} region_id={}", input.name, input.region_id),
                    e,
                )
            })
    }

    /// Insert a batch of cities in one statement. Rows come back in input order.
    pub async fn create_many(pool: &PgPool, items: &[CreateCity]) -> Result<Vec<City>, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO cities (name, latitude, longitude, region_id) ");
        builder.push_values(items, |mut row, city| {
            row.push_bind(&city.name)
                .push_bind(coordinates::to_text(city.latitude))
                .push_bind(coordinates::to_text(city.longitude))
                .push_bind(city.region_id);
        });
        builder.push(format!(" RETURNING {COLUMNS}"));
        builder
            .build_query_as::<City>()
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("cities.create_many", &format!("count={}", items.len()), e))
    }

    /// Find a live city by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<City>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cities WHERE id = $1 AND {LIVE}");
        sqlx::query_as::<_, City>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("cities.find_by_id", &format!("id={id}"), e))
    }

    /// Find a live city with this name inside a region, optionally ignoring one id.
    pub async fn find_by_name(
        pool: &PgPool,
        region_id: DbId,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Option<City>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cities
             WHERE region_id = $1 AND name = $2 AND ($3::BIGINT IS NULL OR id <> $3) AND {LIVE}"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(region_id)
            .bind(name)
            .bind(exclude_id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "cities.find_by_name",
                    &format!("region_id={region_id} name={name}"),
                    e,
                )
            })
    }

    /// Of the given `(region_id, name)` pairs, return those already taken by live cities.
    pub async fn existing_names(
        pool: &PgPool,
        pairs: &[(DbId, String)],
    ) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        let region_ids: Vec<DbId> = pairs.iter().map(|(r, _)| *r).collect();
        let names: Vec<String> = pairs.iter().map(|(_, n)| n.clone()).collect();
        let query = format!(
            "SELECT region_id, name FROM cities
             WHERE (region_id, name) IN (SELECT * FROM UNNEST($1::BIGINT[], $2::TEXT[]))
               AND {LIVE}"
        );
        sqlx::query_as::<_, (DbId, String)>(&query)
            .bind(&region_ids)
            .bind(&names)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("cities.existing_names", &format!("count={}", pairs.len()), e))
    }

    /// List live cities, optionally restricted to one region.
    pub async fn list(pool: &PgPool, region_id: Option<DbId>) -> Result<Vec<City>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cities
             WHERE ($1::BIGINT IS NULL OR region_id = $1) AND {LIVE}
             ORDER BY id"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(region_id)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("cities.list", &format!("region_id={region_id:?}"), e))
    }

    /// Which of `ids` belong to live cities.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!("SELECT id FROM cities WHERE id = ANY($1) AND {LIVE}");
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("cities.existing_ids", &format!("ids={ids:?}"), e))
    }

    /// Update a city. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCity,
    ) -> Result<Option<City>, sqlx::Error> {
        let query = format!(
            "UPDATE cities SET
                name = COALESCE($2, name),
                latitude = COALESCE($3, latitude),
                longitude = COALESCE($4, longitude),
                region_id = COALESCE($5, region_id),
                updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(coordinates::to_text_opt(input.latitude))
            .bind(coordinates::to_text_opt(input.longitude))
            .bind(input.region_id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("cities.update", &format!("id={id}"), e))
    }

    /// Soft-delete a city by id. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE cities SET record_status = $2, updated_at = NOW() WHERE id = $1 AND {LIVE}"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(RecordStatus::Deleted)
            .execute(pool)
            .await
            .inspect_err(|e| log_db_error("cities.soft_delete", &format!("id={id}"), e))?;
        Ok(result.rows_affected() > 0)
    }
}
