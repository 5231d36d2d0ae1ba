//! Configuration loader with layered sources.

use crate::{AppConfig, FeatureSet};
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use std::sync::Arc;
use svckit_core::{SvcError, SvcResult};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides (not committed)
    /// 4. Environment variables with `SVCKIT__` prefix
    pub fn new(config_dir: impl Into<String>) -> SvcResult<Self> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> SvcResult<Self> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Returns the feature set of the current configuration.
    pub async fn features(&self) -> FeatureSet {
        FeatureSet::from_config(&*self.config.read().await)
    }

    /// Reloads the configuration from disk.
    ///
    /// Feature flags are intentionally not re-evaluated by consumers after
    /// startup; a reload affects values read afterwards, not clients that
    /// were already constructed.
    pub async fn reload(&self) -> SvcResult<()> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> SvcResult<AppConfig> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("SVCKIT_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        // 1. Load default configuration
        let default_path = format!("{config_dir}/default.toml");
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        // 2. Load environment-specific configuration
        let env_path = format!("{config_dir}/{environment}.toml");
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        // 3. Load local overrides (not committed to version control)
        let local_path = format!("{config_dir}/local.toml");
        if Path::new(&local_path).exists() {
            debug!("Loading local config from: {}", local_path);
            builder = builder.add_source(File::with_name(&local_path).required(false));
        }

        // 4. Override with environment variables (SVCKIT_ prefix)
        builder = builder.add_source(
            Environment::with_prefix("SVCKIT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_svc_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_svc_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Validates that enabled integrations carry the endpoints they need.
    fn validate_config(config: &AppConfig) -> SvcResult<()> {
        if config.database.enabled && config.database.url.is_empty() {
            return Err(SvcError::system(
                "database is enabled but database.url is empty",
            ));
        }
        if config.redis.enabled && config.redis.url.is_empty() {
            return Err(SvcError::system("redis is enabled but redis.url is empty"));
        }
        if config.mq.enabled && config.mq.name_server.is_empty() {
            return Err(SvcError::system(
                "mq is enabled but mq.name_server is empty",
            ));
        }
        if config.discovery.enabled {
            if config.discovery.address.is_empty() {
                return Err(SvcError::system(
                    "discovery is enabled but discovery.address is empty",
                ));
            }
            if config.discovery.service_name.is_empty() {
                return Err(SvcError::system(
                    "discovery is enabled but discovery.service_name is empty",
                ));
            }
        }
        Ok(())
    }

    /// Gets a specific configuration value by key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

fn config_error_to_svc_error(err: ConfigError) -> SvcError {
    SvcError::system(format!("configuration error: {err}"))
}
