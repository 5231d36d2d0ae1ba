//! In-process broker backed by a tokio channel.
//!
//! Useful in tests and in single-process deployments that want the
//! producer/consumer split without an external broker.

use crate::{Broker, LocalTransaction, OutboundMessage, SendReceipt, TransactionVote};
use async_trait::async_trait;
use svckit_core::SvcResult;
use tokio::sync::mpsc;
use tracing::debug;

/// Broker that delivers messages over an unbounded in-process channel.
pub struct ChannelBroker {
    sender: mpsc::UnboundedSender<OutboundMessage>,
}

impl ChannelBroker {
    /// Creates a broker and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Broker for ChannelBroker {
    async fn publish(&self, message: OutboundMessage) -> SvcResult<SendReceipt> {
        let receipt = SendReceipt::generate(message.topic.clone());
        self.sender
            .send(message)
            .map_err(|e| svckit_core::SvcError::system(format!("channel closed: {e}")))?;
        Ok(receipt)
    }

    async fn publish_transactional(
        &self,
        message: OutboundMessage,
        transaction: &dyn LocalTransaction,
    ) -> SvcResult<SendReceipt> {
        let receipt = SendReceipt::generate(message.topic.clone());
        match transaction.execute().await? {
            TransactionVote::Commit => {
                self.sender
                    .send(message)
                    .map_err(|e| svckit_core::SvcError::system(format!("channel closed: {e}")))?;
            }
            TransactionVote::Rollback => {
                debug!(
                    "Transaction rolled back; discarding message for topic '{}'",
                    message.topic
                );
            }
        }
        Ok(receipt)
    }
}
