//! Queue configuration loaded from environment variables.

/// Default capacity of the in-process publish buffer.
const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Broker connection settings.
///
/// | Env var             | Default |
/// |---------------------|---------|
/// | `AMQP_URL`          | (unset: messages are logged and dropped) |
/// | `QUEUE_BUFFER_SIZE` | `1024`  |
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub amqp_url: Option<String>,
    pub buffer_size: usize,
}

impl QueueConfig {
    pub fn from_env() -> Self {
        let amqp_url = std::env::var("AMQP_URL").ok().filter(|s| !s.is_empty());
        let buffer_size = std::env::var("QUEUE_BUFFER_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_BUFFER_SIZE);
        Self {
            amqp_url,
            buffer_size,
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            amqp_url: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}
