pub mod recording_sink;
pub mod vec_source;

pub use recording_sink::{RecordedFindings, RecordingSink};
pub use vec_source::{SourceProbe, VecSource};
