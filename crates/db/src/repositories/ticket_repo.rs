//! Repository for the `tickets` table.

use kindquest_core::types::DbId;
use sqlx::PgPool;

use crate::errors::log_db_error;
use crate::models::record_status::{RecordStatus, LIVE};
use crate::models::ticket::Ticket;

const COLUMNS: &str = "id, user_id, chat_id, is_resolved, record_status, created_at, updated_at";

/// Provides CRUD operations for support tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a ticket bound to an already-created chat room.
    pub async fn create(pool: &PgPool, user_id: DbId, chat_id: &str) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (user_id, chat_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(user_id)
            .bind(chat_id)
            .fetch_one(pool)
            .await
            .inspect_err(|e| {
                log_db_error("tickets.create", &format!("user_id={user_id} chat_id={chat_id}"), e)
            })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1 AND {LIVE}");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("tickets.find_by_id", &format!("id={id}"), e))
    }

    /// List live tickets, newest first. `None` lists every user's tickets.
    pub async fn list(pool: &PgPool, user_id: Option<DbId>) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets
             WHERE ($1::BIGINT IS NULL OR user_id = $1) AND {LIVE}
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("tickets.list", &format!("user_id={user_id:?}"), e))
    }

    pub async fn set_resolved(
        pool: &PgPool,
        id: DbId,
        is_resolved: bool,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET is_resolved = $2, updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(is_resolved)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("tickets.set_resolved", &format!("id={id}"), e))
    }

    /// Soft-delete a ticket. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET record_status = $2, updated_at = NOW() WHERE id = $1 AND {LIVE}"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(RecordStatus::Deleted)
            .execute(pool)
            .await
            .inspect_err(|e| log_db_error("tickets.soft_delete", &format!("id={id}"), e))?;
        Ok(result.rows_affected() > 0)
    }
}
