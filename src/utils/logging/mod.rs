//! Logging setup
//!
//! Thin layer over `tracing-subscriber`: level and format come from the
//! configuration, `RUST_LOG` overrides the level.

pub mod utils;

pub use utils::{LogFormat, LogLevel, LoggingConfig, build_filter, init_logging};
