//! Telemetry for the loader.
//!
//! Structured logging setup and the cascade span. The library only emits
//! `tracing` events; installing a subscriber is left to the application.

mod logging;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use spans::{CascadeSpan, SpanExt};
