//! Producer wrapping a broker with timeouts and send modes.

use crate::{Broker, DelayLevel, LocalTransaction, OutboundMessage, SendReceipt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use svckit_config::MqConfig;
use svckit_core::{SvcError, SvcResult};
use tracing::{debug, error, info};

/// Message producer.
///
/// Serializes payloads, enforces the configured send timeout on
/// synchronous sends and offers fire-and-forget, delayed and transactional
/// variants.
pub struct MqProducer {
    broker: Arc<dyn Broker>,
    send_timeout: Duration,
}

impl MqProducer {
    /// Creates a producer over a broker using the configured send timeout.
    #[must_use]
    pub fn new(broker: Arc<dyn Broker>, config: &MqConfig) -> Self {
        Self {
            broker,
            send_timeout: config.send_timeout(),
        }
    }

    /// Creates a producer with an explicit send timeout.
    #[must_use]
    pub fn with_timeout(broker: Arc<dyn Broker>, send_timeout: Duration) -> Self {
        Self {
            broker,
            send_timeout,
        }
    }

    /// Sends a message and waits for the broker acknowledgement.
    pub async fn send_sync<T: Serialize>(
        &self,
        topic: &str,
        payload: &T,
    ) -> SvcResult<SendReceipt> {
        let message = OutboundMessage::new(topic, payload)?;
        self.publish_with_timeout(message).await
    }

    /// Sends a message without waiting for the acknowledgement.
    ///
    /// The send runs on a background task; failures are logged, not
    /// surfaced to the caller.
    pub fn send_async<T: Serialize>(&self, topic: &str, payload: &T) -> SvcResult<()> {
        let message = OutboundMessage::new(topic, payload)?;
        let broker = Arc::clone(&self.broker);
        let topic = topic.to_string();
        tokio::spawn(async move {
            match broker.publish(message).await {
                Ok(receipt) => {
                    debug!(
                        "Async send to topic '{}' acknowledged as {}",
                        topic, receipt.message_id
                    );
                }
                Err(e) => {
                    error!("Async send to topic '{}' failed: {}", topic, e);
                }
            }
        });
        Ok(())
    }

    /// Sends a message for delivery after a fixed delay tier.
    pub async fn send_delayed<T: Serialize>(
        &self,
        topic: &str,
        payload: &T,
        delay: DelayLevel,
    ) -> SvcResult<SendReceipt> {
        let message = OutboundMessage::new(topic, payload)?.with_delay(delay);
        let receipt = self.publish_with_timeout(message).await?;
        info!(
            "Sent delayed message {} to topic '{}' (level {})",
            receipt.message_id,
            topic,
            delay.level()
        );
        Ok(receipt)
    }

    /// Sends a message whose delivery is tied to a local transaction.
    ///
    /// The message is only delivered if the transaction votes to commit.
    /// Transactional sends are not bounded by the send timeout since the
    /// local work may legitimately outlast it.
    pub async fn send_transactional<T: Serialize>(
        &self,
        topic: &str,
        payload: &T,
        transaction: &dyn LocalTransaction,
    ) -> SvcResult<SendReceipt> {
        let message = OutboundMessage::new(topic, payload)?;
        let receipt = self.broker.publish_transactional(message, transaction).await?;
        info!(
            "Transactional message {} resolved for topic '{}'",
            receipt.message_id, topic
        );
        Ok(receipt)
    }

    async fn publish_with_timeout(&self, message: OutboundMessage) -> SvcResult<SendReceipt> {
        let topic = message.topic.clone();
        match tokio::time::timeout(self.send_timeout, self.broker.publish(message)).await {
            Ok(result) => result,
            Err(_) => Err(SvcError::system(format!(
                "send to topic '{}' timed out after {:?}",
                topic, self.send_timeout
            ))),
        }
    }
}
