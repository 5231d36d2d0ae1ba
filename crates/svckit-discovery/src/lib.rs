//! # Svckit Discovery
//!
//! Service registry integration: a [`DiscoveryClient`] seam with a Consul
//! agent implementation, plus the registration and instance records the
//! starter uses to announce a service on boot.

mod client;
mod consul;
mod instance;

pub use client::DiscoveryClient;
pub use consul::ConsulClient;
pub use instance::{ServiceInstance, ServiceRegistration};
