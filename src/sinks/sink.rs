use crate::core::Finding;
use crate::sinks::error::SinkError;

/// Durable destination for findings.
///
/// Each call persists exactly one finding with its full context. A failed
/// call leaves the sink usable for subsequent findings.
pub trait FindingSink {
    fn record(&mut self, finding: &Finding) -> Result<(), SinkError>;
}
