mod error;
pub mod generators;
mod json_lines_source;
mod source;

pub use error::SourceError;
pub use json_lines_source::JsonLinesSource;
pub use source::{Poll, ReadingSource};
