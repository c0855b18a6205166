use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use tracing::debug;

use crate::core::Finding;
use crate::sinks::error::SinkError;
use crate::sinks::sink::FindingSink;

/// SQLite-backed archive of findings, one row per anomaly.
///
/// Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
/// precision, so ordering and range queries on the text column follow time
/// order.
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Creates or opens the archive at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened anomaly archive");
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, SinkError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, SinkError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS anomalies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                value REAL NOT NULL,
                z_score REAL NOT NULL,
                mean REAL NOT NULL,
                std_dev REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS anomalies_timestamp ON anomalies (timestamp);",
        )?;
        Ok(Self { conn })
    }

    /// Findings observed at or after `since`, oldest first.
    pub fn findings_since(&self, since: DateTime<Utc>) -> Result<Vec<Finding>, SinkError> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, value, z_score, mean, std_dev FROM anomalies
             WHERE timestamp >= ?1 ORDER BY timestamp, id",
        )?;

        let rows = stmt.query_map(params![encode_timestamp(since)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (ts, value, z_score, baseline_mean, baseline_std_dev) = row?;
            let observed_at = DateTime::parse_from_rfc3339(&ts)
                .map_err(|e| SinkError::Corrupt(format!("timestamp {ts:?}: {e}")))?
                .with_timezone(&Utc);
            out.push(Finding {
                value,
                z_score,
                baseline_mean,
                baseline_std_dev,
                observed_at,
            });
        }
        Ok(out)
    }

    pub fn count(&self) -> Result<u64, SinkError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM anomalies", [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }
}

fn encode_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl FindingSink for SqliteSink {
    fn record(&mut self, finding: &Finding) -> Result<(), SinkError> {
        self.conn.execute(
            "INSERT INTO anomalies (timestamp, value, z_score, mean, std_dev)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                encode_timestamp(finding.observed_at),
                finding.value,
                finding.z_score,
                finding.baseline_mean,
                finding.baseline_std_dev,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn finding(secs: i64, value: f64) -> Finding {
        Finding {
            value,
            z_score: 4.5,
            baseline_mean: 50.0,
            baseline_std_dev: 2.0,
            observed_at: Utc.timestamp_opt(secs, 250_000_000).unwrap(),
        }
    }

    #[test]
    fn records_and_queries_by_timestamp() {
        let mut sink = SqliteSink::in_memory().unwrap();
        sink.record(&finding(1_700_000_100, 1.0)).unwrap();
        sink.record(&finding(1_700_000_300, 3.0)).unwrap();
        sink.record(&finding(1_700_000_200, 2.0)).unwrap();
        assert_eq!(sink.count().unwrap(), 3);

        let since = Utc.timestamp_opt(1_700_000_150, 0).unwrap();
        let got = sink.findings_since(since).unwrap();
        assert_eq!(got, vec![finding(1_700_000_200, 2.0), finding(1_700_000_300, 3.0)]);
    }

    #[test]
    fn stored_findings_keep_full_context() {
        let mut sink = SqliteSink::in_memory().unwrap();
        let f = Finding {
            value: 151.25,
            z_score: 70.710678,
            baseline_mean: 50.0,
            baseline_std_dev: 1.414213,
            observed_at: Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap(),
        };
        sink.record(&f).unwrap();
        let got = sink.findings_since(Utc.timestamp_opt(0, 0).unwrap()).unwrap();
        assert_eq!(got, vec![f]);
    }

    #[test]
    fn file_archive_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.sqlite3");
        {
            let mut sink = SqliteSink::open(&path).unwrap();
            sink.record(&finding(1_700_000_000, 9.0)).unwrap();
        }
        let sink = SqliteSink::open(&path).unwrap();
        assert_eq!(sink.count().unwrap(), 1);
    }
}
