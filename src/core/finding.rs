use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

use crate::utils::math::two_sided_tail_probability;

/// An anomalous reading together with the baseline it was judged against.
///
/// `baseline_mean` and `baseline_std_dev` describe the estimator *before*
/// `value` was folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub value: f64,
    pub z_score: f64,
    pub baseline_mean: f64,
    pub baseline_std_dev: f64,
    pub observed_at: DateTime<Utc>,
}

impl Finding {
    /// Probability of a deviation at least this large under a normal baseline.
    #[inline]
    pub fn tail_probability(&self) -> f64 {
        two_sided_tail_probability(self.z_score)
    }
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "value={:.4}, z={:.2}, mean={:.4}, std={:.4}, at={}",
            self.value,
            self.z_score,
            self.baseline_mean,
            self.baseline_std_dev,
            self.observed_at.to_rfc3339()
        )
    }
}
