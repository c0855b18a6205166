mod error;
mod json_lines_sink;
mod sink;
mod sqlite_sink;

pub use error::SinkError;
pub use json_lines_sink::JsonLinesSink;
pub use sink::FindingSink;
pub use sqlite_sink::SqliteSink;
