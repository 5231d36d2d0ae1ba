//! # Svckit Starter
//!
//! Bootstrap layer: reads the feature flags of a loaded configuration and
//! wires up only the enabled integrations, yielding a [`ServiceKit`] the
//! application carries for its lifetime.

mod kit;
mod logging;

pub use kit::{KitBuilder, ServiceKit};
pub use logging::init_logging;
