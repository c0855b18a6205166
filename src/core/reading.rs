use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// A single numeric observation taken from the inbound stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

impl Reading {
    #[inline]
    pub fn new(value: f64, observed_at: DateTime<Utc>) -> Self {
        Self { value, observed_at }
    }

    /// Decodes a raw message payload.
    ///
    /// The payload must be a JSON object with a numeric `reading` field. An
    /// optional `timestamp` (unix seconds, fractional allowed) becomes
    /// `observed_at`; without one, or when it is not a representable instant,
    /// `arrived_at` is used instead. Any other field is ignored.
    pub fn from_payload(payload: &[u8], arrived_at: DateTime<Utc>) -> Result<Self, MalformedReading> {
        let text = std::str::from_utf8(payload).map_err(|e| MalformedReading(e.to_string()))?;
        let decoded: ReadingPayload =
            serde_json::from_str(text).map_err(|e| MalformedReading(e.to_string()))?;

        let observed_at = decoded
            .timestamp
            .and_then(timestamp_from_unix_seconds)
            .unwrap_or(arrived_at);

        Ok(Self::new(decoded.reading, observed_at))
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("malformed reading: {0}")]
pub struct MalformedReading(pub String);

#[derive(Debug, Deserialize)]
struct ReadingPayload {
    reading: f64,
    #[serde(default)]
    timestamp: Option<f64>,
}

fn timestamp_from_unix_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(whole as i64, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn arrival() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn decodes_reading_and_timestamp() {
        let r = Reading::from_payload(br#"{"timestamp": 1700000000.5, "reading": 51.25}"#, arrival())
            .unwrap();
        assert_eq!(r.value, 51.25);
        assert_eq!(r.observed_at.timestamp(), 1_700_000_000);
        assert_eq!(r.observed_at.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn missing_timestamp_falls_back_to_arrival() {
        let r = Reading::from_payload(br#"{"reading": 7}"#, arrival()).unwrap();
        assert_eq!(r.value, 7.0);
        assert_eq!(r.observed_at, arrival());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let r = Reading::from_payload(br#"{"reading": 1.5, "sensor": "t-01", "unit": "C"}"#, arrival())
            .unwrap();
        assert_eq!(r.value, 1.5);
    }

    #[test]
    fn rejects_malformed_payloads() {
        let cases: [&[u8]; 5] = [
            b"not json",
            br#"{"value": 3.0}"#,
            br#"{"reading": "fifty"}"#,
            br#"[1, 2, 3]"#,
            &[0xff, 0xfe, 0x00],
        ];
        for payload in cases {
            assert!(
                Reading::from_payload(payload, arrival()).is_err(),
                "payload {:?} should be rejected",
                String::from_utf8_lossy(payload)
            );
        }
    }
}
