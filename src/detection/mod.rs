mod baseline_policy;
mod detector;
mod error;
mod threshold;

pub use baseline_policy::BaselinePolicy;
pub use detector::Detector;
pub use error::DetectionError;
pub use threshold::{DEFAULT_THRESHOLD, Threshold};
