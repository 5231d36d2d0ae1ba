//! Message types shared by producers and consumers.

use crate::DelayLevel;
use serde::Serialize;
use svckit_core::{SvcError, SvcResult};
use uuid::Uuid;

/// A message ready to hand to a broker: topic plus JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Destination topic.
    pub topic: String,
    /// JSON-encoded payload.
    pub body: String,
    /// Delayed-delivery tier, if any.
    pub delay: Option<DelayLevel>,
}

impl OutboundMessage {
    /// Builds a message by serializing a payload to JSON.
    pub fn new<T: Serialize>(topic: impl Into<String>, payload: &T) -> SvcResult<Self> {
        let body = serde_json::to_string(payload)
            .map_err(|e| SvcError::system(format!("failed to serialize message payload: {e}")))?;
        Ok(Self {
            topic: topic.into(),
            body,
            delay: None,
        })
    }

    /// Attaches a delayed-delivery tier.
    #[must_use]
    pub fn with_delay(mut self, delay: DelayLevel) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A broker acknowledgement for a sent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Broker-assigned message id.
    pub message_id: String,
    /// Topic the message was accepted on.
    pub topic: String,
}

impl SendReceipt {
    /// Builds a receipt with a fresh message id.
    #[must_use]
    pub fn generate(topic: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::new_v4().simple().to_string(),
            topic: topic.into(),
        }
    }
}

/// Outcome of a local transaction tied to a transactional send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionVote {
    /// The local work succeeded; deliver the message.
    Commit,
    /// The local work failed; discard the message.
    Rollback,
}
