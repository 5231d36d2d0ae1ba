//! Typed feature set evaluated once at startup.

use crate::AppConfig;

/// The set of enabled optional integrations.
///
/// Computed from [`AppConfig`] exactly once at startup and immutable for
/// the process lifetime; the bootstrap routine consults it to decide which
/// clients to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSet {
    pub database: bool,
    pub discovery: bool,
    pub logging: bool,
    pub rpc: bool,
    pub redis: bool,
    pub mq: bool,
}

impl FeatureSet {
    /// Evaluates the feature flags of a loaded configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            database: config.database.enabled,
            discovery: config.discovery.enabled,
            logging: config.logging.enabled,
            rpc: config.rpc.enabled,
            redis: config.redis.enabled,
            mq: config.mq.enabled,
        }
    }

    /// Names of the enabled features, for startup logging.
    #[must_use]
    pub fn enabled_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.database {
            names.push("database");
        }
        if self.discovery {
            names.push("discovery");
        }
        if self.logging {
            names.push("logging");
        }
        if self.rpc {
            names.push("rpc");
        }
        if self.redis {
            names.push("redis");
        }
        if self.mq {
            names.push("mq");
        }
        names
    }

    /// Whether any optional integration is enabled.
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        !self.enabled_names().is_empty()
    }
}
