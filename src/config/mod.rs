pub mod build;
pub mod choices;
mod loader;
pub mod logging;

pub use build::{BuildError, build_detector, build_monitor, build_sink, build_source};
pub use choices::{MonitorConfig, SinkChoice, SourceChoice};
pub use loader::{config_schema, load_config, parse_config};
pub use logging::{LoggingConfig, init_logging};
