use crate::config::build::BuildError;
use crate::config::choices::SinkChoice;
use crate::sinks::{FindingSink, JsonLinesSink, SqliteSink};

pub fn build_sink(choice: SinkChoice) -> Result<Box<dyn FindingSink>, BuildError> {
    match choice {
        SinkChoice::Sqlite(p) => Ok(Box::new(SqliteSink::open(p.path)?)),
        SinkChoice::JsonLines(p) => Ok(Box::new(JsonLinesSink::open(p.path)?)),
    }
}
