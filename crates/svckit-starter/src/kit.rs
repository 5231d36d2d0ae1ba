//! Flag-gated bootstrap of the optional integrations.

use crate::init_logging;
use std::sync::Arc;
use svckit_config::{AppConfig, FeatureSet};
use svckit_core::{SvcError, SvcResult};
use svckit_discovery::{ConsulClient, DiscoveryClient, ServiceRegistration};
use svckit_mq::{Broker, MqProducer};
use svckit_redis::RedisStore;
use svckit_rpc::{RpcClient, RpcDispatcher};
use tracing::{info, warn};

/// The assembled service toolkit.
///
/// Each integration is constructed only when its feature flag is enabled;
/// accessors for disabled integrations return an error rather than a
/// half-initialized client.
pub struct ServiceKit {
    config: AppConfig,
    features: FeatureSet,
    redis: Option<Arc<RedisStore>>,
    mq: Option<Arc<MqProducer>>,
    discovery: Option<Arc<dyn DiscoveryClient>>,
    rpc: Option<Arc<RpcClient>>,
}

impl std::fmt::Debug for ServiceKit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceKit")
            .field("redis", &self.redis.is_some())
            .field("mq", &self.mq.is_some())
            .field("discovery", &self.discovery.is_some())
            .field("rpc", &self.rpc.is_some())
            .finish_non_exhaustive()
    }
}

impl ServiceKit {
    /// Starts building a kit from a loaded configuration.
    #[must_use]
    pub fn builder(config: AppConfig) -> KitBuilder {
        KitBuilder::new(config)
    }

    /// The configuration the kit was built from.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The feature flags evaluated at build time.
    #[must_use]
    pub fn features(&self) -> FeatureSet {
        self.features
    }

    /// The Redis store, when the redis flag is enabled.
    pub fn redis(&self) -> SvcResult<Arc<RedisStore>> {
        self.redis
            .clone()
            .ok_or_else(|| SvcError::system("redis integration is not enabled"))
    }

    /// The message producer, when the mq flag is enabled.
    pub fn mq(&self) -> SvcResult<Arc<MqProducer>> {
        self.mq
            .clone()
            .ok_or_else(|| SvcError::system("mq integration is not enabled"))
    }

    /// The registry client, when the discovery flag is enabled.
    pub fn discovery(&self) -> SvcResult<Arc<dyn DiscoveryClient>> {
        self.discovery
            .clone()
            .ok_or_else(|| SvcError::system("discovery integration is not enabled"))
    }

    /// The RPC client, when the rpc flag is enabled.
    pub fn rpc(&self) -> SvcResult<Arc<RpcClient>> {
        self.rpc
            .clone()
            .ok_or_else(|| SvcError::system("rpc integration is not enabled"))
    }

    /// Graceful shutdown: removes this instance from the registry.
    pub async fn shutdown(&self) -> SvcResult<()> {
        if let Some(discovery) = &self.discovery {
            discovery.deregister_all().await?;
        }
        info!("Service kit shut down");
        Ok(())
    }
}

/// Builder assembling a [`ServiceKit`] from configuration plus injected
/// transports.
///
/// The broker and RPC dispatcher are transport seams with no bundled
/// default, so enabling their flags without injecting an implementation
/// is a configuration error.
pub struct KitBuilder {
    config: AppConfig,
    broker: Option<Arc<dyn Broker>>,
    rpc_dispatcher: Option<Arc<dyn RpcDispatcher>>,
    discovery_client: Option<Arc<dyn DiscoveryClient>>,
}

impl KitBuilder {
    /// Creates a builder over a loaded configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            broker: None,
            rpc_dispatcher: None,
            discovery_client: None,
        }
    }

    /// Injects the message broker transport.
    #[must_use]
    pub fn with_broker(mut self, broker: Arc<dyn Broker>) -> Self {
        self.broker = Some(broker);
        self
    }

    /// Injects the RPC transport.
    #[must_use]
    pub fn with_rpc_dispatcher(mut self, dispatcher: Arc<dyn RpcDispatcher>) -> Self {
        self.rpc_dispatcher = Some(dispatcher);
        self
    }

    /// Overrides the registry client; defaults to a Consul agent client.
    #[must_use]
    pub fn with_discovery_client(mut self, client: Arc<dyn DiscoveryClient>) -> Self {
        self.discovery_client = Some(client);
        self
    }

    /// Builds the kit, constructing and wiring every enabled integration.
    pub async fn build(self) -> SvcResult<ServiceKit> {
        let features = FeatureSet::from_config(&self.config);

        if features.logging {
            init_logging(&self.config.logging)?;
        }

        if features.any_enabled() {
            info!("Enabled integrations: {}", features.enabled_names().join(", "));
        } else {
            info!("No optional integrations enabled");
        }

        if features.database {
            // The flag is honored for validation and reporting, but no
            // database client ships with the kit.
            warn!("database flag is enabled but no database client is bundled");
        }

        let redis = if features.redis {
            let pool = svckit_redis::create_pool(&self.config.redis).await?;
            Some(Arc::new(RedisStore::new(Arc::new(pool))))
        } else {
            None
        };

        let mq = if features.mq {
            let broker = self.broker.ok_or_else(|| {
                SvcError::system("mq is enabled but no broker implementation was provided")
            })?;
            Some(Arc::new(MqProducer::new(broker, &self.config.mq)))
        } else {
            None
        };

        let rpc = if features.rpc {
            let dispatcher = self.rpc_dispatcher.ok_or_else(|| {
                SvcError::system("rpc is enabled but no dispatcher implementation was provided")
            })?;
            Some(Arc::new(RpcClient::new(dispatcher, &self.config.rpc)))
        } else {
            None
        };

        let discovery = if features.discovery {
            let client: Arc<dyn DiscoveryClient> = match self.discovery_client {
                Some(client) => client,
                None => Arc::new(ConsulClient::new(&self.config.discovery)?),
            };
            let registration = ServiceRegistration::from_config(&self.config.discovery);
            client.register(&registration).await?;
            Some(client)
        } else {
            None
        };

        Ok(ServiceKit {
            config: self.config,
            features,
            redis,
            mq,
            discovery,
            rpc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use svckit_discovery::ServiceInstance;
    use svckit_mq::ChannelBroker;
    use svckit_rpc::{RpcContext, RpcRequest};

    #[derive(Default)]
    struct RecordingRegistry {
        registered: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DiscoveryClient for RecordingRegistry {
        async fn register(&self, registration: &ServiceRegistration) -> SvcResult<()> {
            self.registered.lock().push(registration.id.clone());
            Ok(())
        }

        async fn deregister(&self, instance_id: &str) -> SvcResult<()> {
            self.registered.lock().retain(|id| id != instance_id);
            Ok(())
        }

        async fn lookup(&self, _service_name: &str) -> SvcResult<Vec<ServiceInstance>> {
            Ok(Vec::new())
        }

        async fn deregister_all(&self) -> SvcResult<()> {
            self.registered.lock().clear();
            Ok(())
        }
    }

    struct EchoDispatcher;

    #[async_trait]
    impl RpcDispatcher for EchoDispatcher {
        async fn dispatch(&self, request: RpcRequest) -> SvcResult<String> {
            Ok(request.body)
        }
    }

    #[tokio::test]
    async fn default_config_builds_an_empty_kit() {
        let kit = ServiceKit::builder(AppConfig::default()).build().await.unwrap();
        assert!(!kit.features().any_enabled());
        assert!(kit.redis().is_err());
        assert!(kit.mq().is_err());
        assert!(kit.discovery().is_err());
        assert!(kit.rpc().is_err());
    }

    #[tokio::test]
    async fn mq_enabled_without_broker_is_rejected() {
        let mut config = AppConfig::default();
        config.mq.enabled = true;
        let result = ServiceKit::builder(config).build().await;
        assert!(result.unwrap_err().is_system());
    }

    #[tokio::test]
    async fn rpc_enabled_without_dispatcher_is_rejected() {
        let mut config = AppConfig::default();
        config.rpc.enabled = true;
        let result = ServiceKit::builder(config).build().await;
        assert!(result.unwrap_err().is_system());
    }

    #[tokio::test]
    async fn mq_flag_wires_the_producer() {
        let mut config = AppConfig::default();
        config.mq.enabled = true;
        let (broker, mut inbox) = ChannelBroker::new();

        let kit = ServiceKit::builder(config)
            .with_broker(Arc::new(broker))
            .build()
            .await
            .unwrap();

        kit.mq().unwrap().send_sync("orders", &1).await.unwrap();
        assert_eq!(inbox.recv().await.unwrap().topic, "orders");
    }

    #[tokio::test]
    async fn rpc_flag_wires_the_client() {
        let mut config = AppConfig::default();
        config.rpc.enabled = true;

        let kit = ServiceKit::builder(config)
            .with_rpc_dispatcher(Arc::new(EchoDispatcher))
            .build()
            .await
            .unwrap();

        let resp: i32 = kit
            .rpc()
            .unwrap()
            .call(&RpcContext::new(), "echo", "ping", &7)
            .await
            .unwrap();
        assert_eq!(resp, 7);
    }

    #[tokio::test]
    async fn discovery_flag_registers_and_shutdown_deregisters() {
        let mut config = AppConfig::default();
        config.discovery.enabled = true;
        config.discovery.service_name = "billing".to_string();
        let registry = Arc::new(RecordingRegistry::default());

        let kit = ServiceKit::builder(config)
            .with_discovery_client(registry.clone())
            .build()
            .await
            .unwrap();

        assert_eq!(registry.registered.lock().len(), 1);
        assert!(registry.registered.lock()[0].starts_with("billing-"));

        kit.shutdown().await.unwrap();
        assert!(registry.registered.lock().is_empty());
    }
}
