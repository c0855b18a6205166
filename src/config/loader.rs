use anyhow::{Context, Result};
use schemars::{Schema, schema_for};
use std::fs;
use std::path::Path;

use crate::config::choices::MonitorConfig;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MonitorConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&text).with_context(|| format!("parsing config file {}", path.display()))
}

pub fn parse_config(text: &str) -> Result<MonitorConfig> {
    Ok(serde_json::from_str(text)?)
}

/// JSON Schema describing the config file.
pub fn config_schema() -> Schema {
    schema_for!(MonitorConfig)
}
