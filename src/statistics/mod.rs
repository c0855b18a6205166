mod estimator;
mod welford_estimator;

pub use estimator::{BaselineStats, Estimator, NonFiniteValue};
pub use welford_estimator::{EstimatorState, WelfordEstimator};
