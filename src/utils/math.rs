use std::f64::consts::SQRT_2;

/// Two-sided tail probability `P(|Z| >= z)` for a standard normal `Z`.
pub fn two_sided_tail_probability(z: f64) -> f64 {
    libm::erfc(z.abs() / SQRT_2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_probability_matches_known_quantiles() {
        assert!((two_sided_tail_probability(0.0) - 1.0).abs() < 1e-12);
        assert!((two_sided_tail_probability(1.959_963_985) - 0.05).abs() < 1e-6);
        assert!((two_sided_tail_probability(3.0) - 0.002_699_796).abs() < 1e-8);
    }

    #[test]
    fn tail_probability_is_symmetric() {
        assert_eq!(
            two_sided_tail_probability(-2.5),
            two_sided_tail_probability(2.5)
        );
    }
}
