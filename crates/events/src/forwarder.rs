//! Background task that drains the publish buffer into AMQP.
//!
//! [`QueueForwarder::run`] connects once at startup. Without a broker URL,
//! or when the connection fails, it keeps draining the buffer and logs each
//! dropped message so producers never block. The loop ends when every
//! [`QueuePublisher`](crate::publisher::QueuePublisher) is dropped or the
//! cancellation token fires.

use std::collections::HashSet;

use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::QueueError;
use crate::publisher::{Destination, OutboundMessage};

/// Drains outbound messages into the broker.
pub struct QueueForwarder;

impl QueueForwarder {
    /// Run the forwarding loop until the buffer closes or `cancel` fires.
    pub async fn run(
        amqp_url: Option<String>,
        mut receiver: mpsc::Receiver<OutboundMessage>,
        cancel: CancellationToken,
    ) {
        let mut sink = match amqp_url {
            Some(url) => match BrokerSink::connect(&url).await {
                Ok(sink) => {
                    tracing::info!("Connected to message broker");
                    Some(sink)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Message broker unavailable, messages will be dropped");
                    None
                }
            },
            None => {
                tracing::info!("AMQP_URL not set, queue messages will be logged and dropped");
                None
            }
        };

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Queue forwarder cancelled");
                    break;
                }
                next = receiver.recv() => {
                    let Some(message) = next else {
                        tracing::info!("Publish buffer closed, queue forwarder shutting down");
                        break;
                    };
                    match sink.as_mut() {
                        Some(sink) => {
                            if let Err(e) = sink.send(&message).await {
                                tracing::error!(
                                    error = %e,
                                    destination = ?message.destination,
                                    "Failed to forward queue message"
                                );
                            }
                        }
                        None => {
                            tracing::debug!(
                                destination = ?message.destination,
                                body = %message.body,
                                "Dropping queue message"
                            );
                        }
                    }
                }
            }
        }
    }
}

/// An open AMQP channel plus the names already declared on it.
struct BrokerSink {
    // Held so the connection outlives the channel.
    _connection: Connection,
    channel: Channel,
    queues: HashSet<String>,
    exchanges: HashSet<String>,
}

impl BrokerSink {
    async fn connect(url: &str) -> Result<Self, QueueError> {
        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(QueueError::Connect)?;
        let channel = connection.create_channel().await.map_err(QueueError::Connect)?;
        Ok(Self {
            _connection: connection,
            channel,
            queues: HashSet::new(),
            exchanges: HashSet::new(),
        })
    }

    async fn send(&mut self, message: &OutboundMessage) -> Result<(), QueueError> {
        let payload = serde_json::to_vec(&message.body)?;
        let (exchange, routing_key) = match &message.destination {
            Destination::Queue(queue) => {
                self.declare_queue(queue).await?;
                ("", queue.as_str())
            }
            Destination::Topic {
                exchange,
                routing_key,
            } => {
                self.declare_exchange(exchange).await?;
                (exchange.as_str(), routing_key.as_str())
            }
        };

        self.channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default().with_content_type("application/json".into()),
            )
            .await
            .map_err(QueueError::Publish)?
            .await
            .map_err(QueueError::Publish)?;
        Ok(())
    }

    async fn declare_queue(&mut self, queue: &str) -> Result<(), QueueError> {
        if self.queues.contains(queue) {
            return Ok(());
        }
        let options = QueueDeclareOptions {
            durable: true,
            ..Default::default()
        };
        self.channel
            .queue_declare(queue, options, FieldTable::default())
            .await
            .map_err(QueueError::Publish)?;
        self.queues.insert(queue.to_string());
        Ok(())
    }

    async fn declare_exchange(&mut self, exchange: &str) -> Result<(), QueueError> {
        if self.exchanges.contains(exchange) {
            return Ok(());
        }
        let options = ExchangeDeclareOptions {
            durable: true,
            ..Default::default()
        };
        self.channel
            .exchange_declare(exchange, ExchangeKind::Topic, options, FieldTable::default())
            .await
            .map_err(QueueError::Publish)?;
        self.exchanges.insert(exchange.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::QueuePublisher;

    #[tokio::test]
    async fn without_broker_drains_until_publishers_drop() {
        let (publisher, rx) = QueuePublisher::new(8);
        let handle = tokio::spawn(QueueForwarder::run(None, rx, CancellationToken::new()));

        assert!(publisher.publish("q", serde_json::json!({"n": 1})));
        drop(publisher);

        handle.await.expect("forwarder should exit cleanly");
    }

    #[tokio::test]
    async fn stops_on_cancel() {
        let (_publisher, rx) = QueuePublisher::new(8);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(QueueForwarder::run(None, rx, cancel.clone()));

        cancel.cancel();

        handle.await.expect("forwarder should exit after cancel");
    }
}
