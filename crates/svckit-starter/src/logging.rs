//! Tracing subscriber installation.

use svckit_config::LoggingConfig;
use svckit_core::{SvcError, SvcResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber according to the logging
/// section.
///
/// Does nothing when logging is disabled. `RUST_LOG` takes precedence
/// over the configured level when set.
pub fn init_logging(config: &LoggingConfig) -> SvcResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = if config.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| SvcError::system(format!("failed to install tracing subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_logging_is_a_no_op() {
        let config = LoggingConfig::default();
        assert!(!config.enabled);
        init_logging(&config).unwrap();
        // Still uninstalled, so a second call must also succeed.
        init_logging(&config).unwrap();
    }
}
