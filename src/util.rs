//! Shared helpers: colours, logging summaries and tracing setup.

pub mod color;
pub mod log;
pub mod telemetry;
