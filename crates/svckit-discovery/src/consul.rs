//! Consul agent implementation of the registry client.

use crate::{DiscoveryClient, ServiceInstance, ServiceRegistration};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use svckit_config::DiscoveryConfig;
use svckit_core::{SvcError, SvcResult};
use tracing::{info, warn};

/// Registry client talking to a local Consul agent over HTTP.
pub struct ConsulClient {
    base_url: String,
    http: reqwest::Client,
    /// Instance ids registered through this client, for shutdown cleanup.
    registered: Mutex<Vec<String>>,
}

/// Body of `PUT /v1/agent/service/register`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RegisterBody {
    #[serde(rename = "ID")]
    id: String,
    name: String,
    address: String,
    port: u16,
    tags: Vec<String>,
    check: CheckBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CheckBody {
    #[serde(rename = "HTTP")]
    http: String,
    interval: String,
    deregister_critical_service_after: String,
}

/// One entry of `GET /v1/health/service/{name}?passing`.
#[derive(Debug, Deserialize)]
struct HealthEntry {
    #[serde(rename = "Service")]
    service: HealthService,
}

#[derive(Debug, Deserialize)]
struct HealthService {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Service")]
    service: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Port")]
    port: u16,
    #[serde(rename = "Tags", default)]
    tags: Vec<String>,
}

impl ConsulClient {
    /// Creates a client for the configured agent address.
    pub fn new(config: &DiscoveryConfig) -> SvcResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SvcError::system(format!("failed to build http client: {e}")))?;
        Ok(Self {
            base_url: config.address.trim_end_matches('/').to_string(),
            http,
            registered: Mutex::new(Vec::new()),
        })
    }

    fn agent_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl DiscoveryClient for ConsulClient {
    async fn register(&self, registration: &ServiceRegistration) -> SvcResult<()> {
        let body = RegisterBody {
            id: registration.id.clone(),
            name: registration.name.clone(),
            address: registration.host.clone(),
            port: registration.port,
            tags: registration.tags.clone(),
            check: CheckBody {
                http: registration.health_url(),
                interval: format!("{}s", registration.check_interval_secs),
                deregister_critical_service_after: format!(
                    "{}s",
                    registration.deregister_after_secs
                ),
            },
        };

        let response = self
            .http
            .put(self.agent_url("/v1/agent/service/register"))
            .json(&body)
            .send()
            .await
            .map_err(|e| SvcError::system(format!("service registration failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SvcError::system(format!(
                "service registration rejected: {}",
                response.status()
            )));
        }

        self.registered.lock().push(registration.id.clone());
        info!(
            "Registered service '{}' as instance '{}'",
            registration.name, registration.id
        );
        Ok(())
    }

    async fn deregister(&self, instance_id: &str) -> SvcResult<()> {
        let response = self
            .http
            .put(self.agent_url(&format!("/v1/agent/service/deregister/{instance_id}")))
            .send()
            .await
            .map_err(|e| SvcError::system(format!("service deregistration failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SvcError::system(format!(
                "service deregistration rejected: {}",
                response.status()
            )));
        }

        self.registered.lock().retain(|id| id != instance_id);
        info!("Deregistered instance '{}'", instance_id);
        Ok(())
    }

    async fn lookup(&self, service_name: &str) -> SvcResult<Vec<ServiceInstance>> {
        let response = self
            .http
            .get(self.agent_url(&format!("/v1/health/service/{service_name}")))
            .query(&[("passing", "true")])
            .send()
            .await
            .map_err(|e| SvcError::system(format!("service lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SvcError::system(format!(
                "service lookup rejected: {}",
                response.status()
            )));
        }

        let entries: Vec<HealthEntry> = response
            .json()
            .await
            .map_err(|e| SvcError::system(format!("failed to parse registry response: {e}")))?;

        Ok(entries
            .into_iter()
            .map(|entry| ServiceInstance {
                id: entry.service.id,
                name: entry.service.service,
                host: entry.service.address,
                port: entry.service.port,
                tags: entry.service.tags,
            })
            .collect())
    }

    async fn deregister_all(&self) -> SvcResult<()> {
        let ids: Vec<String> = self.registered.lock().drain(..).collect();
        for id in ids {
            if let Err(e) = self.deregister(&id).await {
                warn!("Failed to deregister instance '{}': {}", id, e);
            }
        }
        Ok(())
    }
}
