//! # Svckit Config
//!
//! Layered configuration for svckit services: defaults, environment
//! overrides and `SVCKIT__` environment variables, with one typed section
//! and one boolean feature flag per optional integration.

mod app_config;
mod features;
mod loader;

pub use app_config::*;
pub use features::*;
pub use loader::*;
