//! # Svckit MQ
//!
//! Message queue abstractions: a producer with synchronous, asynchronous,
//! delayed and transactional send modes, typed consumers, fixed delay
//! tiers and an in-process channel broker for tests and single-process
//! deployments.

mod broker;
mod channel;
mod consumer;
mod delay;
mod message;
mod producer;

pub use broker::{Broker, LocalTransaction};
pub use channel::ChannelBroker;
pub use consumer::{consume, dispatch, MessageHandler};
pub use delay::DelayLevel;
pub use message::{OutboundMessage, SendReceipt, TransactionVote};
pub use producer::MqProducer;
