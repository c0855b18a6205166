mod error;
mod monitor_loop;
mod shutdown;
mod snapshot;

pub use error::MonitorError;
pub use monitor_loop::{DEFAULT_POLL_INTERVAL, DEFAULT_PROGRESS_EVERY, MonitorLoop, MonitorOptions};
pub use shutdown::ShutdownSignal;
pub use snapshot::{MonitorReport, MonitorSnapshot};
