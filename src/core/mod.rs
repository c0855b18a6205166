mod finding;
mod reading;

pub use finding::Finding;
pub use reading::{MalformedReading, Reading};
