use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::detection::error::DetectionError;

pub const DEFAULT_THRESHOLD: f64 = 3.0;

/// z-score cutoff; a reading is anomalous only when its score is strictly
/// greater than this value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Result<Self, DetectionError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DetectionError::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_exceeded_by(self, z_score: f64) -> bool {
        z_score > self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = DetectionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(t: Threshold) -> Self {
        t.0
    }
}
