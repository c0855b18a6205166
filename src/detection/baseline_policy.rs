use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Which readings are folded into the baseline after being judged.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BaselinePolicy {
    /// Every accepted reading updates the baseline, anomalous or not. A
    /// sustained level shift is eventually absorbed and stops alerting.
    #[default]
    AbsorbAll,

    /// Readings that produced a finding are left out of the baseline, so a
    /// sustained shift keeps alerting until the detector is replaced.
    ExcludeAnomalies,
}

impl BaselinePolicy {
    #[inline]
    pub fn absorbs(self, flagged: bool) -> bool {
        match self {
            BaselinePolicy::AbsorbAll => true,
            BaselinePolicy::ExcludeAnomalies => !flagged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn names_round_trip_through_strum_and_serde() {
        assert_eq!(BaselinePolicy::ExcludeAnomalies.to_string(), "exclude-anomalies");
        assert_eq!(
            BaselinePolicy::from_str("absorb-all").unwrap(),
            BaselinePolicy::AbsorbAll
        );
        let p: BaselinePolicy = serde_json::from_str("\"exclude-anomalies\"").unwrap();
        assert_eq!(p, BaselinePolicy::ExcludeAnomalies);
    }

    #[test]
    fn absorb_rules() {
        assert!(BaselinePolicy::AbsorbAll.absorbs(true));
        assert!(BaselinePolicy::AbsorbAll.absorbs(false));
        assert!(!BaselinePolicy::ExcludeAnomalies.absorbs(true));
        assert!(BaselinePolicy::ExcludeAnomalies.absorbs(false));
    }
}
