//! # zlog - asynchronous multi-sink logging
//!
//! zlog buffers structured records submitted from any thread, filters them
//! by severity, and delivers them through a single background worker to the
//! console and to per-level or unified log files, with optional size- or
//! day-based rotation.
//!
//! ## Architecture
//!
//! - `logger`: the facade (lifecycle, configuration, submission, metrics)
//!   and the process-wide instance
//! - `backend`: the pipeline (bounded queue, worker, formatter, console and
//!   file sinks, rotator)
//! - `levels`, `record`, `config`, `error`, `metrics`: the data model
//! - `stream`, `macros`: call-site ergonomics over the submission path
//!
//! ## Quick start
//!
//! ```no_run
//! use zlog::{Level, logger, zinfo};
//!
//! logger().initialize().unwrap();
//! zinfo!("server listening on {}", 8080);
//! logger().log_direct(Level::Warning, "low disk space", file!(), "main", line!());
//! logger().shutdown(3000);
//! ```
//!
//! Producers never block on I/O: submission appends to a bounded in-memory
//! queue and overflow is counted, not delivered. Records still queued when
//! a shutdown drain times out are dropped by design.

mod backend;
mod config;
mod error;
mod levels;
mod logger;
mod macros;
mod metrics;
mod record;
mod stream;

pub use config::{
    DEFAULT_MAX_BUFFER_SIZE, DEFAULT_MAX_CACHE_SIZE, DEFAULT_MAX_LOG_SIZE, DEFAULT_OUTPUT_DIR,
    DEFAULT_OUTPUT_FILE, DEFAULT_PROGRAM_NAME, DEFAULT_SHUTDOWN_TIMEOUT_MS, default_level_file,
};
pub use error::{Result, ZlogError};
pub use levels::{
    ALL_LEVELS, COLOR_OUT, COLOR_RESET, CONSOLE_OUT, DEFAULT_OUTPUT_MODE, FILE_OUT, FileMode,
    LEVEL_COUNT, Level, RotatePolicy,
};
pub use logger::{Logger, logger};
pub use macros::{ScopeGuard, TimerGuard};
pub use record::Record;
pub use stream::LogStream;

#[cfg(test)]
mod tests;
