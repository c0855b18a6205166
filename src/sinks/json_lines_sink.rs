use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::Finding;
use crate::sinks::error::SinkError;
use crate::sinks::sink::FindingSink;

/// Appends each finding as one JSON object per line.
pub struct JsonLinesSink {
    w: BufWriter<File>,
}

impl JsonLinesSink {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(file),
        })
    }
}

impl FindingSink for JsonLinesSink {
    fn record(&mut self, finding: &Finding) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.w, finding)?;
        self.w.write_all(b"\n")?;
        self.w.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn appends_one_object_per_line() {
        let tf = NamedTempFile::new().unwrap();
        let f = Finding {
            value: 150.0,
            z_score: 70.5,
            baseline_mean: 50.0,
            baseline_std_dev: 1.5,
            observed_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        };

        {
            let mut sink = JsonLinesSink::open(tf.path()).unwrap();
            sink.record(&f).unwrap();
        }
        {
            let mut sink = JsonLinesSink::open(tf.path()).unwrap();
            sink.record(&f).unwrap();
        }

        let got = fs::read_to_string(tf.path()).unwrap();
        let lines: Vec<&str> = got.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: Finding = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(back, f);
        assert!(lines[0].starts_with("{\"value\":150.0,\"z_score\":70.5"));
    }
}
