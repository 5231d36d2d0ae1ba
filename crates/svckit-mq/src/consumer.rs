//! Consumer side: typed handlers and dispatch.

use crate::OutboundMessage;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use svckit_core::{SvcError, SvcResult};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// A typed handler for one topic.
///
/// Implementations receive already-deserialized payloads; malformed bodies
/// and handler failures are routed to [`MessageHandler::on_error`], which
/// logs by default.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Payload type messages on this topic deserialize into.
    type Message: DeserializeOwned + Send;

    /// The topic this handler subscribes to.
    fn topic(&self) -> &str;

    /// Processes one message.
    async fn handle(&self, message: Self::Message) -> SvcResult<()>;

    /// Called when a message cannot be deserialized or the handler fails.
    async fn on_error(&self, error: &SvcError, raw_body: &str) {
        error!(
            "Handler for topic '{}' failed: {} (body: {})",
            self.topic(),
            error,
            raw_body
        );
    }
}

/// Delivers one raw message to a handler.
///
/// Messages for other topics are skipped. Errors are reported through
/// `on_error` and also returned so callers can count failures.
pub async fn dispatch<H: MessageHandler>(
    handler: &H,
    message: &OutboundMessage,
) -> SvcResult<()> {
    if message.topic != handler.topic() {
        debug!(
            "Skipping message for topic '{}' (handler subscribes to '{}')",
            message.topic,
            handler.topic()
        );
        return Ok(());
    }

    let payload: H::Message = match serde_json::from_str(&message.body) {
        Ok(payload) => payload,
        Err(e) => {
            let error = SvcError::system(format!("failed to deserialize message: {e}"));
            handler.on_error(&error, &message.body).await;
            return Err(error);
        }
    };

    if let Err(error) = handler.handle(payload).await {
        handler.on_error(&error, &message.body).await;
        return Err(error);
    }

    Ok(())
}

/// Drains a channel, dispatching every message to the handler.
///
/// Runs until the sending side is dropped. Per-message failures are
/// logged and do not stop the loop.
pub async fn consume<H: MessageHandler>(
    mut receiver: mpsc::UnboundedReceiver<OutboundMessage>,
    handler: H,
) {
    info!("Consumer started for topic '{}'", handler.topic());
    while let Some(message) = receiver.recv().await {
        let _ = dispatch(&handler, &message).await;
    }
    info!("Consumer stopped for topic '{}'", handler.topic());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Deserialize)]
    struct OrderPlaced {
        id: u64,
    }

    struct OrderHandler {
        seen: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MessageHandler for OrderHandler {
        type Message = OrderPlaced;

        fn topic(&self) -> &str {
            "orders"
        }

        async fn handle(&self, message: OrderPlaced) -> SvcResult<()> {
            assert!(message.id > 0);
            self.seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn dispatch_deserializes_and_handles() {
        let seen = Arc::new(AtomicUsize::new(0));
        let handler = OrderHandler { seen: seen.clone() };
        let message = OutboundMessage {
            topic: "orders".to_string(),
            body: r#"{"id":9}"#.to_string(),
            delay: None,
        };
        dispatch(&handler, &message).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dispatch_skips_other_topics() {
        let seen = Arc::new(AtomicUsize::new(0));
        let handler = OrderHandler { seen: seen.clone() };
        let message = OutboundMessage {
            topic: "payments".to_string(),
            body: r#"{"id":9}"#.to_string(),
            delay: None,
        };
        dispatch(&handler, &message).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dispatch_reports_malformed_body() {
        let handler = OrderHandler {
            seen: Arc::new(AtomicUsize::new(0)),
        };
        let message = OutboundMessage {
            topic: "orders".to_string(),
            body: "not json".to_string(),
            delay: None,
        };
        let result = dispatch(&handler, &message).await;
        assert!(result.unwrap_err().is_system());
    }

    #[tokio::test]
    async fn consume_drains_until_sender_dropped() {
        let seen = Arc::new(AtomicUsize::new(0));
        let handler = OrderHandler { seen: seen.clone() };
        let (sender, receiver) = mpsc::unbounded_channel();

        for id in 1..=3 {
            sender
                .send(OutboundMessage {
                    topic: "orders".to_string(),
                    body: format!(r#"{{"id":{id}}}"#),
                    delay: None,
                })
                .unwrap();
        }
        drop(sender);

        consume(receiver, handler).await;
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }
}
