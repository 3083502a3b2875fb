//! KindQuest outbound messaging.
//!
//! - [`QueueEvent`] is the envelope for domain events sent to the broker.
//! - [`QueuePublisher`] is the cheap, cloneable handle request handlers use
//!   to enqueue messages into a bounded in-process buffer.
//! - [`QueueForwarder`] is the background task that drains the buffer into
//!   AMQP, or logs and drops messages when no broker is configured.

pub mod config;
pub mod error;
pub mod event;
pub mod forwarder;
pub mod publisher;

pub use config::QueueConfig;
pub use error::QueueError;
pub use event::QueueEvent;
pub use forwarder::QueueForwarder;
pub use publisher::{Destination, OutboundMessage, QueuePublisher};
