use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

const DEFAULT_SEED: u64 = 42;
fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_mean() -> f64 {
    50.0
}

fn default_std_dev() -> f64 {
    5.0
}

fn default_spike_probability() -> f64 {
    0.02
}

fn default_spike_factor() -> f64 {
    3.0
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct JsonLinesSourceParameters {
    #[schemars(
        with = "String",
        title = "Path",
        description = "File with one JSON payload per line",
        extend("format" = "path", "x-must-exist" = true)
    )]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GeneratorParameters {
    #[serde(default = "default_mean")]
    #[schemars(title = "Mean", description = "Centre of the normal readings")]
    pub mean: f64,

    #[serde(default = "default_std_dev")]
    #[schemars(
        title = "Standard Deviation",
        description = "Spread of the normal readings",
        range(min = 0.0)
    )]
    pub std_dev: f64,

    #[serde(default = "default_spike_probability")]
    #[schemars(
        title = "Spike Probability",
        description = "Chance (0.0–1.0) that a reading is a spike",
        range(min = 0.0, max = 1.0)
    )]
    pub spike_probability: f64,

    #[serde(default = "default_spike_factor")]
    #[schemars(title = "Spike Factor", description = "Multiplier applied to spikes")]
    pub spike_factor: f64,

    #[serde(default)]
    #[schemars(
        title = "Max Readings",
        description = "Upper bound on readings; empty = infinite"
    )]
    pub max_readings: Option<u64>,

    #[serde(default)]
    #[schemars(
        title = "Interval (ms)",
        description = "Delay between readings; 0 = as fast as polled"
    )]
    pub interval_ms: u64,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed")]
    pub seed: u64,
}

impl Default for GeneratorParameters {
    fn default() -> Self {
        Self {
            mean: default_mean(),
            std_dev: default_std_dev(),
            spike_probability: default_spike_probability(),
            spike_factor: default_spike_factor(),
            max_readings: None,
            interval_ms: 0,
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(SourceKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum SourceChoice {
    #[strum_discriminants(strum(
        message = "Standard Input",
        detailed_message = "JSON payloads piped in, one per line."
    ))]
    Stdin,

    #[strum_discriminants(strum(
        message = "JSON Lines File",
        detailed_message = "JSON payloads read from a file, one per line."
    ))]
    JsonLines(JsonLinesSourceParameters),

    #[strum_discriminants(strum(
        message = "Sensor Generator",
        detailed_message = "Synthetic normal readings with occasional spikes."
    ))]
    SensorGenerator(GeneratorParameters),
}

impl Default for SourceChoice {
    fn default() -> Self {
        SourceChoice::Stdin
    }
}

impl SourceChoice {
    pub fn kind(&self) -> SourceKind {
        SourceKind::from(self)
    }
}
