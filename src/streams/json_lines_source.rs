use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender, sync_channel};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::streams::error::SourceError;
use crate::streams::source::{Poll, ReadingSource};

const CHANNEL_CAPACITY: usize = 1024;

type Line = Result<Vec<u8>, std::io::Error>;

/// Newline-delimited payloads read from a file, stdin or any reader.
///
/// A background thread reads lines into a bounded channel so that [`poll`]
/// can wait with a timeout even when the reader itself blocks (a pipe or a
/// terminal). Blank lines are skipped.
///
/// [`poll`]: ReadingSource::poll
pub struct JsonLinesSource {
    name: String,
    rx: Option<Receiver<Line>>,
}

impl JsonLinesSource {
    pub fn from_reader<R: Read + Send + 'static>(name: impl Into<String>, reader: R) -> Self {
        let name = name.into();
        let (tx, rx) = sync_channel(CHANNEL_CAPACITY);
        let thread_name = format!("reader-{name}");
        let spawned = thread::Builder::new()
            .name(thread_name)
            .spawn(move || pump_lines(BufReader::new(reader), tx));

        let rx = match spawned {
            Ok(_) => Some(rx),
            Err(e) => {
                // No reader thread means nothing will ever arrive.
                tracing::error!(source = %name, error = %e, "failed to start reader thread");
                None
            }
        };

        Self { name, rx }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::from_reader(path.display().to_string(), file))
    }

    pub fn stdin() -> Self {
        Self::from_reader("stdin", std::io::stdin())
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn pump_lines<R: BufRead>(mut reader: R, tx: SyncSender<Line>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => {
                let line = trim_line(&buf);
                if line.is_empty() {
                    continue;
                }
                if tx.send(Ok(line.to_vec())).is_err() {
                    return;
                }
            }
            Err(e) => {
                let _ = tx.send(Err(e));
                return;
            }
        }
    }
}

fn trim_line(buf: &[u8]) -> &[u8] {
    let start = buf
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(buf.len());
    let end = buf
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &buf[start..end]
}

impl ReadingSource for JsonLinesSource {
    fn poll(&mut self, timeout: Duration) -> Result<Poll, SourceError> {
        let Some(rx) = &self.rx else {
            return Ok(Poll::Closed);
        };

        match rx.recv_timeout(timeout) {
            Ok(Ok(line)) => Ok(Poll::Message(line)),
            Ok(Err(e)) => {
                self.rx = None;
                Err(SourceError::Io(e))
            }
            Err(RecvTimeoutError::Timeout) => Ok(Poll::Empty),
            Err(RecvTimeoutError::Disconnected) => {
                self.rx = None;
                Ok(Poll::Closed)
            }
        }
    }

    fn close(&mut self) -> Result<(), SourceError> {
        // Dropping the receiver makes the reader thread stop at its next send.
        if self.rx.take().is_some() {
            debug!(source = %self.name, "source closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Error, ErrorKind, Write};
    use tempfile::NamedTempFile;

    const WAIT: Duration = Duration::from_secs(5);

    fn drain(source: &mut JsonLinesSource) -> Vec<String> {
        let mut out = Vec::new();
        loop {
            match source.poll(WAIT).unwrap() {
                Poll::Message(m) => out.push(String::from_utf8(m).unwrap()),
                Poll::Empty => continue,
                Poll::Closed => return out,
            }
        }
    }

    #[test]
    fn yields_lines_in_order_then_closes() {
        let data = "{\"reading\": 1}\n\n  {\"reading\": 2}  \r\n{\"reading\": 3}";
        let mut source = JsonLinesSource::from_reader("mem", Cursor::new(data));
        assert_eq!(
            drain(&mut source),
            vec!["{\"reading\": 1}", "{\"reading\": 2}", "{\"reading\": 3}"]
        );
        assert_eq!(source.poll(WAIT).unwrap(), Poll::Closed);
    }

    #[test]
    fn reads_from_file() {
        let mut tf = NamedTempFile::new().unwrap();
        writeln!(tf, "{{\"reading\": 10.5}}").unwrap();
        writeln!(tf, "garbage").unwrap();
        tf.flush().unwrap();

        let mut source = JsonLinesSource::open(tf.path()).unwrap();
        assert_eq!(drain(&mut source), vec!["{\"reading\": 10.5}", "garbage"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = JsonLinesSource::open("/definitely/not/here.jsonl")
            .err()
            .unwrap();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn close_is_idempotent_and_ends_polling() {
        let mut source = JsonLinesSource::from_reader("mem", Cursor::new("{\"reading\": 1}\n"));
        source.close().unwrap();
        source.close().unwrap();
        assert_eq!(source.poll(WAIT).unwrap(), Poll::Closed);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(Error::new(ErrorKind::BrokenPipe, "pipe gone"))
        }
    }

    #[test]
    fn read_errors_are_fatal() {
        let mut source = JsonLinesSource::from_reader("broken", FailingReader);
        let err = loop {
            match source.poll(WAIT) {
                Ok(Poll::Empty) => continue,
                Ok(other) => panic!("unexpected poll result {other:?}"),
                Err(e) => break e,
            }
        };
        assert!(matches!(err, SourceError::Io(_)));
        assert_eq!(source.poll(WAIT).unwrap(), Poll::Closed);
    }

    #[test]
    fn idle_reader_reports_empty() {
        // A reader that never finishes within the timeout.
        struct Slow;
        impl Read for Slow {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                thread::sleep(Duration::from_millis(500));
                Ok(0)
            }
        }
        let mut source = JsonLinesSource::from_reader("slow", Slow);
        assert_eq!(source.poll(Duration::from_millis(10)).unwrap(), Poll::Empty);
    }
}
