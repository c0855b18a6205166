pub mod config;
pub mod core;
pub mod detection;
pub mod sinks;
pub mod statistics;
pub mod streams;
pub mod tasks;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
