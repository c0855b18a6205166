mod monitor_config;
mod sink_choice;
mod source_choice;

pub use monitor_config::*;
pub use sink_choice::*;
pub use source_choice::*;
