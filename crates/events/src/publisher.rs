//! Non-blocking publish handle backed by a bounded `tokio::sync::mpsc` buffer.
//!
//! Publishing never waits on the broker: a message is either accepted into
//! the buffer (`true`) or rejected because the buffer is full or the
//! forwarder has stopped (`false`). Callers treat a rejection as a logged,
//! best-effort failure.

use tokio::sync::mpsc;

use crate::event::{QueueEvent, EVENTS_EXCHANGE};

/// Where a message should be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A named queue on the default exchange.
    Queue(String),
    /// A topic exchange with a routing key.
    Topic { exchange: String, routing_key: String },
}

/// A message waiting in the buffer.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub destination: Destination,
    pub body: serde_json::Value,
}

/// Cloneable producer side of the publish buffer.
#[derive(Debug, Clone)]
pub struct QueuePublisher {
    sender: mpsc::Sender<OutboundMessage>,
}

impl QueuePublisher {
    /// Create a publisher and the receiver the forwarder drains.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// A publisher whose receiver is dropped: every publish reports `false`.
    /// Used where no broker or forwarder exists, such as tests.
    pub fn detached() -> Self {
        let (publisher, _receiver) = Self::new(1);
        publisher
    }

    /// Enqueue `body` for a named queue.
    pub fn publish(&self, queue: &str, body: serde_json::Value) -> bool {
        self.enqueue(OutboundMessage {
            destination: Destination::Queue(queue.to_string()),
            body,
        })
    }

    /// Enqueue `body` for a topic exchange under `routing_key`.
    pub fn publish_topic(&self, exchange: &str, routing_key: &str, body: serde_json::Value) -> bool {
        self.enqueue(OutboundMessage {
            destination: Destination::Topic {
                exchange: exchange.to_string(),
                routing_key: routing_key.to_string(),
            },
            body,
        })
    }

    /// Enqueue a domain event on the events exchange, routed by its type.
    pub fn publish_event(&self, event: &QueueEvent) -> bool {
        match serde_json::to_value(event) {
            Ok(body) => self.publish_topic(EVENTS_EXCHANGE, &event.event_type, body),
            Err(e) => {
                tracing::error!(error = %e, event_type = %event.event_type, "Failed to encode event");
                false
            }
        }
    }

    fn enqueue(&self, message: OutboundMessage) -> bool {
        match self.sender.try_send(message) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(message)) => {
                tracing::warn!(destination = ?message.destination, "Publish buffer full, message rejected");
                false
            }
            Err(mpsc::error::TrySendError::Closed(message)) => {
                tracing::warn!(destination = ?message.destination, "Publish buffer closed, message rejected");
                false
            }
        }
    }
}
