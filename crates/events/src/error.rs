//! Errors raised while forwarding messages to the broker.

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Broker connection failed: {0}")]
    Connect(#[source] lapin::Error),

    #[error("Broker publish failed: {0}")]
    Publish(#[source] lapin::Error),

    #[error("Message encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
