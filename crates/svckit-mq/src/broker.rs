//! Broker and local-transaction seams.

use crate::{OutboundMessage, SendReceipt, TransactionVote};
use async_trait::async_trait;
use svckit_core::SvcResult;

/// Transport seam between the producer and an actual message broker.
///
/// Implementations own the wire protocol; the producer layers timeouts,
/// logging and transactional coordination on top.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Hands one message to the broker and waits for its acknowledgement.
    async fn publish(&self, message: OutboundMessage) -> SvcResult<SendReceipt>;

    /// Publishes a half message, runs the local transaction, then commits
    /// or rolls back delivery according to the vote.
    async fn publish_transactional(
        &self,
        message: OutboundMessage,
        transaction: &dyn LocalTransaction,
    ) -> SvcResult<SendReceipt>;
}

/// Local work coupled to a transactional send.
#[async_trait]
pub trait LocalTransaction: Send + Sync {
    /// Runs the local work and votes on whether the message may be
    /// delivered.
    async fn execute(&self) -> SvcResult<TransactionVote>;
}
