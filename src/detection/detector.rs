use chrono::{DateTime, Utc};

use crate::core::{Finding, Reading};
use crate::detection::baseline_policy::BaselinePolicy;
use crate::detection::threshold::Threshold;
use crate::statistics::{BaselineStats, Estimator, NonFiniteValue, WelfordEstimator};

/// z-score anomaly detector over an online baseline.
///
/// Every reading is judged against the baseline as it stood *before* that
/// reading, and only afterwards folded in (subject to the [`BaselinePolicy`]).
/// Judging after the update would let each outlier inflate the very spread it
/// is compared against.
///
/// The detector owns its estimator; a stream lane that needs its own baseline
/// needs its own detector.
#[derive(Debug, Clone)]
pub struct Detector<E: Estimator = WelfordEstimator> {
    estimator: E,
    threshold: Threshold,
    policy: BaselinePolicy,
}

impl Detector<WelfordEstimator> {
    pub fn new(threshold: Threshold) -> Self {
        Self::with_estimator(WelfordEstimator::new(), threshold, BaselinePolicy::default())
    }
}

impl Default for Detector<WelfordEstimator> {
    fn default() -> Self {
        Self::new(Threshold::default())
    }
}

impl<E: Estimator> Detector<E> {
    pub fn with_estimator(estimator: E, threshold: Threshold, policy: BaselinePolicy) -> Self {
        Self {
            estimator,
            threshold,
            policy,
        }
    }

    pub fn with_policy(mut self, policy: BaselinePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Judges `value` as observed now.
    pub fn evaluate(&mut self, value: f64) -> Result<Option<Finding>, NonFiniteValue> {
        self.evaluate_at(value, Utc::now())
    }

    pub fn evaluate_reading(&mut self, reading: &Reading) -> Result<Option<Finding>, NonFiniteValue> {
        self.evaluate_at(reading.value, reading.observed_at)
    }

    /// Judges `value` against the current baseline, then folds it in.
    ///
    /// Returns a [`Finding`] when the z-score strictly exceeds the threshold.
    /// Readings that arrive while the baseline has no spread (fewer than two
    /// values, or all values identical) are never flagged. Non-finite values
    /// are rejected before judgment and leave the baseline untouched, as are
    /// values the estimator refuses because they would overflow it.
    pub fn evaluate_at(
        &mut self,
        value: f64,
        observed_at: DateTime<Utc>,
    ) -> Result<Option<Finding>, NonFiniteValue> {
        if !value.is_finite() {
            return Err(NonFiniteValue(value));
        }

        let baseline = self.estimator.current_stats();
        let finding = self.judge(value, baseline, observed_at);

        if self.policy.absorbs(finding.is_some()) {
            self.estimator.update(value)?;
        }

        Ok(finding)
    }

    fn judge(&self, value: f64, baseline: BaselineStats, observed_at: DateTime<Utc>) -> Option<Finding> {
        if !baseline.is_judgeable() {
            return None;
        }

        let z_score = (value - baseline.mean).abs() / baseline.std_dev;
        if !self.threshold.is_exceeded_by(z_score) {
            return None;
        }

        Some(Finding {
            value,
            z_score,
            baseline_mean: baseline.mean,
            baseline_std_dev: baseline.std_dev,
            observed_at,
        })
    }

    #[inline]
    pub fn baseline(&self) -> BaselineStats {
        self.estimator.current_stats()
    }

    #[inline]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    #[inline]
    pub fn policy(&self) -> BaselinePolicy {
        self.policy
    }

    #[inline]
    pub fn estimator(&self) -> &E {
        &self.estimator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(i: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + i, 0).unwrap()
    }

    fn run(detector: &mut Detector, xs: &[f64]) -> Vec<Finding> {
        xs.iter()
            .enumerate()
            .filter_map(|(i, &x)| detector.evaluate_at(x, t(i as i64)).unwrap())
            .collect()
    }

    #[test]
    fn reference_scenario_flags_only_the_spike() {
        let mut detector = Detector::new(Threshold::new(3.0).unwrap());
        let findings = run(&mut detector, &[50.0, 51.0, 49.0, 50.0, 52.0, 48.0, 150.0]);

        assert_eq!(findings.len(), 1);
        let f = findings[0];
        assert_eq!(f.value, 150.0);
        assert!((f.baseline_mean - 50.0).abs() < 1e-12);
        assert!((f.baseline_std_dev - 2.0f64.sqrt()).abs() < 1e-12);
        assert!((f.z_score - 100.0 / 2.0f64.sqrt()).abs() < 1e-9);
        assert_eq!(f.observed_at, t(6));
    }

    #[test]
    fn finding_carries_pre_update_baseline() {
        let mut detector = Detector::new(Threshold::default());
        run(&mut detector, &[10.0, 11.0, 9.0, 10.5, 9.5, 10.0, 10.2, 9.8]);
        let before = detector.baseline();

        let f = detector.evaluate(500.0).unwrap().expect("outlier flagged");
        assert_eq!(f.baseline_mean, before.mean);
        assert_eq!(f.baseline_std_dev, before.std_dev);

        let after = detector.baseline();
        assert_ne!(after.mean, before.mean);
        assert_eq!(detector.estimator().count(), 9);
    }

    #[test]
    fn cold_start_never_flags() {
        let mut detector = Detector::new(Threshold::default());
        assert!(detector.evaluate(1.0).unwrap().is_none());
        assert!(detector.evaluate(1e12).unwrap().is_none());
        assert_eq!(detector.estimator().count(), 2);
    }

    #[test]
    fn constant_history_is_not_judgeable() {
        let mut detector = Detector::new(Threshold::default());
        let findings = run(&mut detector, &[5.0, 5.0, 5.0, 5.0, 1000.0]);
        assert!(findings.is_empty());
    }

    #[test]
    fn score_equal_to_threshold_is_not_flagged() {
        // [0, 0, 0, 4] gives mean 1 and sample sd 2 with no rounding.
        let mut detector = Detector::new(Threshold::new(3.0).unwrap());
        run(&mut detector, &[0.0, 0.0, 0.0, 4.0]);
        assert_eq!(detector.baseline(), BaselineStats { mean: 1.0, std_dev: 2.0 });

        let mut at_threshold = detector.clone();
        assert!(at_threshold.evaluate(7.0).unwrap().is_none());

        let mut above = detector.clone();
        let f = above.evaluate(9.0).unwrap().expect("z = 4 is flagged");
        assert_eq!(f.z_score, 4.0);

        let mut below = detector.clone();
        let f = below.evaluate(-6.0).unwrap().expect("deviation is two-sided");
        assert_eq!(f.z_score, 3.5);
    }

    #[test]
    fn independent_detectors_are_deterministic() {
        let xs: Vec<f64> = (0..500)
            .map(|i| 20.0 + ((i * 37) % 11) as f64 * 0.3 + if i % 97 == 0 { 25.0 } else { 0.0 })
            .collect();
        let mut a = Detector::new(Threshold::default());
        let mut b = Detector::new(Threshold::default());
        let fa = run(&mut a, &xs);
        let fb = run(&mut b, &xs);
        assert!(!fa.is_empty());
        assert_eq!(fa, fb);
    }

    #[test]
    fn non_finite_values_are_rejected_without_touching_baseline() {
        let mut detector = Detector::new(Threshold::default());
        run(&mut detector, &[1.0, 2.0, 3.0]);
        let before = detector.estimator().clone();

        assert!(detector.evaluate(f64::NAN).unwrap_err().0.is_nan());
        assert!(detector.evaluate(f64::INFINITY).is_err());
        assert_eq!(detector.estimator(), &before);

        // later findings are still computed from a clean baseline
        let f = detector.evaluate(100.0).unwrap().unwrap();
        assert_eq!(f.baseline_mean, 2.0);
        assert_eq!(f.baseline_std_dev, 1.0);
    }

    #[test]
    fn extreme_finite_values_cannot_corrupt_the_baseline() {
        let mut detector = Detector::new(Threshold::default());
        assert!(detector.evaluate(1e308).unwrap().is_none());

        for x in [-1e308, 10.0, 11.0, 9.0, 10.0] {
            assert!(detector.evaluate(x).is_err(), "{x} should overflow the baseline");
        }

        let baseline = detector.baseline();
        assert_eq!(detector.estimator().count(), 1);
        assert_eq!(baseline.mean, 1e308);
        assert_eq!(baseline.std_dev, 0.0);
    }

    #[test]
    fn absorb_all_lets_a_level_shift_fade() {
        let mut detector = Detector::new(Threshold::default());
        let mut xs: Vec<f64> = (0..50).map(|i| 10.0 + (i % 3) as f64).collect();
        xs.extend(std::iter::repeat_n(40.0, 200));
        let findings = run(&mut detector, &xs);

        assert!(!findings.is_empty());
        let last_flagged = findings.last().unwrap().observed_at;
        assert!(last_flagged < t(249), "shift should stop alerting eventually");
    }

    #[test]
    fn exclude_anomalies_keeps_alerting_on_a_level_shift() {
        let mut detector = Detector::new(Threshold::default()).with_policy(BaselinePolicy::ExcludeAnomalies);
        let mut xs: Vec<f64> = (0..50).map(|i| 10.0 + (i % 3) as f64).collect();
        xs.extend(std::iter::repeat_n(40.0, 200));
        let findings = run(&mut detector, &xs);

        assert_eq!(findings.len(), 200);
        assert_eq!(detector.estimator().count(), 50);
    }

    #[test]
    fn exclude_anomalies_still_warms_up() {
        let mut detector = Detector::new(Threshold::default()).with_policy(BaselinePolicy::ExcludeAnomalies);
        run(&mut detector, &[1.0, 100.0, 50.0]);
        assert_eq!(detector.estimator().count(), 3);
    }
}
