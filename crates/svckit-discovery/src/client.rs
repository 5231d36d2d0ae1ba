//! Registry client seam.

use crate::{ServiceInstance, ServiceRegistration};
use async_trait::async_trait;
use svckit_core::SvcResult;

/// A client for a service registry.
///
/// The starter registers on boot and deregisters on shutdown through this
/// trait; callers can resolve healthy instances of peer services.
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Announces an instance to the registry.
    async fn register(&self, registration: &ServiceRegistration) -> SvcResult<()>;

    /// Removes an instance from the registry.
    async fn deregister(&self, instance_id: &str) -> SvcResult<()>;

    /// Lists the healthy instances of a service.
    async fn lookup(&self, service_name: &str) -> SvcResult<Vec<ServiceInstance>>;

    /// Whether at least one healthy instance of the service exists.
    async fn health(&self, service_name: &str) -> SvcResult<bool> {
        Ok(!self.lookup(service_name).await?.is_empty())
    }

    /// Removes every instance this client registered.
    async fn deregister_all(&self) -> SvcResult<()>;
}
