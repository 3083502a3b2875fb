//! Repository for the `users` table.

use kindquest_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::errors::log_db_error;
use crate::models::record_status::{RecordStatus, LIVE};
use crate::models::user::{CreateUser, UpdateProfile, User};

const COLUMNS: &str = "id, first_name, last_name, middle_name, email, password_hash, \
    avatar_urls, role, level, experience, organisation_id, record_status, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with the default role, level and experience.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (first_name, last_name, middle_name, email, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.middle_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
            .inspect_err(|e| log_db_error("users.create", &format!("email={}", input.email), e))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND {LIVE}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("users.find_by_id", &format!("id={id}"), e))
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1 AND {LIVE}");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("users.find_by_email", &format!("email={email}"), e))
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                middle_name = COALESCE($4, middle_name),
                avatar_urls = COALESCE($5, avatar_urls),
                organisation_id = COALESCE($6, organisation_id),
                updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.middle_name)
            .bind(&input.avatar_urls)
            .bind(input.organisation_id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("users.update_profile", &format!("id={id}"), e))
    }

    /// Add `amount` experience atomically, clamped to the column range.
    /// Returns the new experience total.
    pub async fn add_experience<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
        amount: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                experience = LEAST(experience::BIGINT + $2, 2147483647)::INTEGER,
                updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING experience"
        );
        sqlx::query_scalar::<_, i32>(&query)
            .bind(id)
            .bind(i64::from(amount))
            .fetch_optional(db)
            .await
            .inspect_err(|e| {
                log_db_error("users.add_experience", &format!("id={id} amount={amount}"), e)
            })
    }

    /// Raise the user's level to `level`. Levels never go down, so concurrent
    /// awards settle on the highest computed value.
    pub async fn raise_level<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
        level: i32,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET level = GREATEST(level, $2), updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(level)
            .fetch_optional(db)
            .await
            .inspect_err(|e| log_db_error("users.raise_level", &format!("id={id} level={level}"), e))
    }

    /// Soft-delete a user. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE users SET record_status = $2, updated_at = NOW() WHERE id = $1 AND {LIVE}"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(RecordStatus::Deleted)
            .execute(pool)
            .await
            .inspect_err(|e| log_db_error("users.soft_delete", &format!("id={id}"), e))?;
        Ok(result.rows_affected() > 0)
    }
}
