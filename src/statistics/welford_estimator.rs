use serde::Serialize;

use crate::statistics::estimator::{BaselineStats, Estimator, NonFiniteValue};

/// Sufficient statistics of everything folded into a [`WelfordEstimator`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct EstimatorState {
    pub count: u64,
    pub mean: f64,
    pub sum_squared_deviations: f64,
}

/// Single-pass mean/variance accumulator (Welford's update).
///
/// Each update moves the mean by `delta / n` and grows the squared-deviation
/// accumulator by `delta * delta2`, where `delta` and `delta2` are the
/// distances of `x` from the mean before and after the move. Unlike a running
/// sum of squares this stays accurate for long streams and for values far
/// from zero.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WelfordEstimator {
    count: u64,
    mean: f64,
    m2: f64,
}

impl WelfordEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EstimatorState {
        EstimatorState {
            count: self.count,
            mean: self.mean,
            sum_squared_deviations: self.m2,
        }
    }

    /// Sample variance (divisor `n - 1`); zero with fewer than two values.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Combines the statistics of another, independently fed estimator.
    ///
    /// The result equals having fed both sequences into one estimator.
    pub fn merge(&mut self, other: &WelfordEstimator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let total = self.count + other.count;
        let n = total as f64;
        let delta = other.mean - self.mean;

        self.mean += delta * n_b / n;
        self.m2 = (self.m2 + other.m2 + delta * delta * n_a * n_b / n).max(0.0);
        self.count = total;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Estimator for WelfordEstimator {
    fn update(&mut self, x: f64) -> Result<(), NonFiniteValue> {
        if !x.is_finite() {
            return Err(NonFiniteValue(x));
        }

        let count = self.count + 1;
        let delta = x - self.mean;
        let mean = self.mean + delta / count as f64;
        let m2 = self.m2 + delta * (x - mean);
        // finite inputs far apart can still overflow the accumulators
        if !mean.is_finite() || !m2.is_finite() {
            return Err(NonFiniteValue(x));
        }

        self.count = count;
        self.mean = mean;
        self.m2 = m2.max(0.0);
        Ok(())
    }

    fn current_stats(&self) -> BaselineStats {
        match self.count {
            0 => BaselineStats::default(),
            1 => BaselineStats {
                mean: self.mean,
                std_dev: 0.0,
            },
            _ => BaselineStats {
                mean: self.mean,
                std_dev: self.variance().sqrt(),
            },
        }
    }

    #[inline]
    fn count(&self) -> u64 {
        self.count
    }
}
