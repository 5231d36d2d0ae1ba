//! Registration and instance records.

use svckit_config::DiscoveryConfig;
use uuid::Uuid;

/// A service registration announced to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistration {
    /// Unique instance id.
    pub id: String,
    /// Logical service name.
    pub name: String,
    /// Address other services reach this instance at.
    pub host: String,
    /// Port other services reach this instance at.
    pub port: u16,
    /// Tags attached to the registration.
    pub tags: Vec<String>,
    /// Health check interval in seconds.
    pub check_interval_secs: u64,
    /// Deregister after this many seconds of failing checks.
    pub deregister_after_secs: u64,
}

impl ServiceRegistration {
    /// Builds a registration from configuration.
    ///
    /// When no instance id is configured, one is derived from the service
    /// name and a random suffix so multiple instances can coexist.
    #[must_use]
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        let id = config.service_id.clone().unwrap_or_else(|| {
            format!(
                "{}-{}",
                config.service_name,
                Uuid::new_v4().simple()
            )
        });
        Self {
            id,
            name: config.service_name.clone(),
            host: config.host.clone(),
            port: config.port,
            tags: config.tags.clone(),
            check_interval_secs: config.check_interval_secs,
            deregister_after_secs: config.deregister_after_secs,
        }
    }

    /// The health check endpoint the registry polls.
    #[must_use]
    pub fn health_url(&self) -> String {
        format!("http://{}:{}/health", self.host, self.port)
    }
}

/// A healthy instance of a service, as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInstance {
    /// Instance id.
    pub id: String,
    /// Logical service name.
    pub name: String,
    /// Instance address.
    pub host: String,
    /// Instance port.
    pub port: u16,
    /// Registration tags.
    pub tags: Vec<String>,
}

impl ServiceInstance {
    /// Base URL for calling this instance over HTTP.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_instance_id_when_absent() {
        let config = DiscoveryConfig {
            service_name: "billing".to_string(),
            ..DiscoveryConfig::default()
        };
        let reg = ServiceRegistration::from_config(&config);
        assert!(reg.id.starts_with("billing-"));
        assert_ne!(reg.id, "billing-");
    }

    #[test]
    fn keeps_configured_instance_id() {
        let config = DiscoveryConfig {
            service_id: Some("billing-1".to_string()),
            ..DiscoveryConfig::default()
        };
        let reg = ServiceRegistration::from_config(&config);
        assert_eq!(reg.id, "billing-1");
    }

    #[test]
    fn instance_base_url() {
        let instance = ServiceInstance {
            id: "a".to_string(),
            name: "billing".to_string(),
            host: "10.0.0.5".to_string(),
            port: 8080,
            tags: vec![],
        };
        assert_eq!(instance.base_url(), "http://10.0.0.5:8080");
    }
}
