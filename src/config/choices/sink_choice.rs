use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("alerts.sqlite3")
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SqliteParameters {
    #[serde(default = "default_sqlite_path")]
    #[schemars(
        with = "String",
        title = "Database Path",
        description = "SQLite file holding the anomalies table",
        extend("format" = "path")
    )]
    pub path: PathBuf,
}

impl Default for SqliteParameters {
    fn default() -> Self {
        Self {
            path: default_sqlite_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct JsonLinesSinkParameters {
    #[schemars(
        with = "String",
        title = "Path",
        description = "File the findings are appended to",
        extend("format" = "path")
    )]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(SinkKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum SinkChoice {
    #[strum_discriminants(strum(
        message = "SQLite Archive",
        detailed_message = "One row per anomaly, queryable by timestamp."
    ))]
    Sqlite(SqliteParameters),

    #[strum_discriminants(strum(
        message = "JSON Lines File",
        detailed_message = "One JSON object per anomaly."
    ))]
    JsonLines(JsonLinesSinkParameters),
}

impl Default for SinkChoice {
    fn default() -> Self {
        SinkChoice::Sqlite(SqliteParameters::default())
    }
}

impl SinkChoice {
    pub fn kind(&self) -> SinkKind {
        SinkKind::from(self)
    }
}
