//! Support tickets backed by chat rooms on the external chat service.

use kindquest_core::types::DbId;
use kindquest_db::models::ticket::{CreateTicket, Ticket};
use kindquest_db::repositories::TicketRepo;
use kindquest_events::event::TICKET_CREATED;
use kindquest_events::QueueEvent;

use super::{forbidden, found, removed};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const ENTITY: &str = "Ticket";

/// Load a ticket visible to `user`: its author, or any admin.
async fn load_visible(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Ticket> {
    let ticket = found(TicketRepo::find_by_id(&state.pool, id).await?, ENTITY, id)?;
    if ticket.user_id != user.user_id && !user.is_admin() {
        return Err(forbidden("Ticket belongs to another user"));
    }
    Ok(ticket)
}

/// Open a chat room, then record the ticket. No ticket is stored when the
/// chat service fails.
pub async fn create(state: &AppState, user: &AuthUser, input: &CreateTicket) -> AppResult<Ticket> {
    let room_name = input
        .subject
        .clone()
        .unwrap_or_else(|| format!("Support request from user {}", user.user_id));

    let chat_id = state.chat.create_room(&room_name).await.map_err(|e| {
        tracing::error!(user_id = user.user_id, error = %e, "Chat room creation failed");
        AppError::InternalError(format!("Chat service unavailable: {e}"))
    })?;

    let ticket = TicketRepo::create(&state.pool, user.user_id, &chat_id).await?;

    let event = QueueEvent::new(TICKET_CREATED)
        .with_entity("ticket", ticket.id)
        .with_user(user.user_id);
    let queued = state.queue.publish_event(&event);
    tracing::info!(ticket_id = ticket.id, user_id = user.user_id, queued, "Ticket created");
    Ok(ticket)
}

/// Admins see every ticket; other users see their own.
pub async fn find_all(state: &AppState, user: &AuthUser) -> AppResult<Vec<Ticket>> {
    let owner = (!user.is_admin()).then_some(user.user_id);
    Ok(TicketRepo::list(&state.pool, owner).await?)
}

pub async fn find_one(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Ticket> {
    load_visible(state, user, id).await
}

pub async fn resolve(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Ticket> {
    load_visible(state, user, id).await?;
    found(TicketRepo::set_resolved(&state.pool, id, true).await?, ENTITY, id)
}

pub async fn remove(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<()> {
    load_visible(state, user, id).await?;
    removed(TicketRepo::soft_delete(&state.pool, id).await?, ENTITY, id)
}
