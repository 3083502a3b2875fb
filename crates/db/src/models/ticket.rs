//! Support ticket model and DTOs.

use kindquest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::record_status::RecordStatus;

/// A ticket row from the `tickets` table. `chat_id` is the room id issued by
/// the external chat service.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: DbId,
    pub user_id: DbId,
    pub chat_id: String,
    pub is_resolved: bool,
    pub record_status: RecordStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /tickets`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicket {
    /// Optional subject used as the chat room title.
    #[validate(length(min = 1, max = 200))]
    pub subject: Option<String>,
}
