use std::str::FromStr;

use anyhow::{Result, anyhow};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    #[schemars(
        title = "Level",
        description = "trace, debug, info, warn or error; RUST_LOG takes precedence"
    )]
    pub level: String,

    #[serde(default)]
    #[schemars(title = "JSON", description = "Emit one JSON object per log record")]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Result<Level> {
        Level::from_str(&self.level).map_err(|_| anyhow!("unknown log level {:?}", self.level))
    }

    /// Filter directives used when `RUST_LOG` is not set.
    pub fn env_filter(&self) -> Result<String> {
        let level = self.level()?.as_str().to_lowercase();
        Ok(format!("warn,spc_monitor={level}"))
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(config.env_filter()?),
    };

    let fmt_layer = if config.json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}
