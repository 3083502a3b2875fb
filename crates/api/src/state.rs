use std::sync::Arc;

use kindquest_cloud::{ChatService, ObjectStorage};
use kindquest_events::QueuePublisher;

use crate::cache::Cache;
use crate::config::ServerConfig;

/// Handles shared by every request. External services sit behind trait
/// objects so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub pool: kindquest_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Backs the region and city list caches.
    pub cache: Arc<dyn Cache>,
    pub storage: Arc<dyn ObjectStorage>,
    /// Opens a support room for each ticket.
    pub chat: Arc<dyn ChatService>,
    pub queue: QueuePublisher,
}
