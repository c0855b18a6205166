use serde::Serialize;
use thiserror::Error;

/// Online estimator of a stream's location and spread.
///
/// Implementations accept values incrementally via [`update`] and expose the
/// current baseline via [`current_stats`], using memory independent of how
/// many values have been seen.
pub trait Estimator {
    /// Folds one value into the accumulated state.
    ///
    /// Non-finite values, and values whose update would overflow the
    /// accumulated state, are rejected and must leave the state untouched.
    fn update(&mut self, x: f64) -> Result<(), NonFiniteValue>;

    /// Returns the current mean and sample standard deviation.
    fn current_stats(&self) -> BaselineStats;

    /// Number of values folded in so far.
    fn count(&self) -> u64;
}

/// Mean and sample standard deviation at a point in the stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct BaselineStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl BaselineStats {
    /// A baseline can only judge readings once it has a positive spread.
    #[inline]
    pub fn is_judgeable(&self) -> bool {
        self.std_dev > 0.0
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("value {0} rejected: baseline must stay finite")]
pub struct NonFiniteValue(pub f64);
