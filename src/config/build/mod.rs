mod error;
mod monitor;
mod sinks;
mod sources;

pub use error::BuildError;

pub use monitor::{build_detector, build_monitor};
pub use sinks::build_sink;
pub use sources::build_source;
