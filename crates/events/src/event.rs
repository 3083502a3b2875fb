//! Domain event envelope published to the broker.

use chrono::{DateTime, Utc};
use kindquest_core::types::DbId;
use serde::{Deserialize, Serialize};

/// A user received an achievement.
pub const ACHIEVEMENT_ASSIGNED: &str = "achievement.assigned";
/// A quest owner confirmed a participant's completion.
pub const QUEST_COMPLETED: &str = "quest.completed";
/// A support ticket and its chat room were opened.
pub const TICKET_CREATED: &str = "ticket.created";

/// Topic exchange every [`QueueEvent`] is routed through, keyed by event type.
pub const EVENTS_EXCHANGE: &str = "kindquest.events";

/// A domain event that occurred on the platform.
///
/// Built with [`QueueEvent::new`] and the `with_*` builder methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEvent {
    /// Dot-separated event name, e.g. `"quest.completed"`. Doubles as the
    /// routing key.
    pub event_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    /// User the event is about or that triggered it.
    pub user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl QueueEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            entity_type: None,
            entity_id: None,
            user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_entity(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id);
        self
    }

    pub fn with_user(mut self, user_id: DbId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}
