//! Runtime configuration state and its defaults.
//!
//! The string- and path-valued settings live here behind the configuration
//! lock. Scalar settings the worker reads during dispatch (output mode, file
//! mode, sizes, thresholds) are stored as atomics on the logger core so
//! dispatch never touches this lock.

use std::path::PathBuf;

use ahash::AHashMap;

use crate::levels::{ALL_LEVELS, Level};

pub const DEFAULT_PROGRAM_NAME: &str = "main";
pub const DEFAULT_OUTPUT_DIR: &str = "./zlog";
pub const DEFAULT_OUTPUT_FILE: &str = "log.txt";

pub const DEFAULT_MAX_LOG_SIZE: u64 = 100 * 1024 * 1024;
pub const DEFAULT_MAX_CACHE_SIZE: usize = 1000;
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 10 * 1024;

/// Default shutdown drain timeout in milliseconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 3000;

/// Default per-level file name under the output directory.
pub fn default_level_file(level: Level) -> &'static str {
    match level {
        Level::Trace => "trace_log.txt",
        Level::Debug => "debug_log.txt",
        Level::Info => "info_log.txt",
        Level::Warning => "warning_log.txt",
        Level::Error => "error_log.txt",
        Level::Fatal => "fatal_log.txt",
    }
}

/// Path-valued configuration, guarded by the configuration lock.
pub(crate) struct Config {
    pub program_name: String,
    pub output_dir: PathBuf,
    /// Level to file path. Filled with defaults at initialization for any
    /// level the caller did not configure explicitly.
    pub level_paths: AHashMap<Level, PathBuf>,
    /// Target of unified output. Empty until single-file mode is selected.
    pub single_file_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            program_name: DEFAULT_PROGRAM_NAME.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            level_paths: AHashMap::new(),
            single_file_path: PathBuf::new(),
        }
    }
}

impl Config {
    /// Fill in the default path for every level not configured explicitly.
    pub fn fill_default_level_paths(&mut self) {
        for level in ALL_LEVELS {
            self.level_paths
                .entry(level)
                .or_insert_with(|| self.output_dir.join(default_level_file(level)));
        }
    }

    /// Resolve a caller-supplied file name: names carrying a separator are
    /// taken verbatim, bare names land under the output directory.
    pub fn resolve_file_name(&self, name: &str) -> PathBuf {
        if has_separator(name) {
            PathBuf::from(name)
        } else {
            self.output_dir.join(name)
        }
    }

    /// Re-parent the filename component of every known path onto the
    /// current output directory. Called after the directory changes.
    pub fn reparent_paths(&mut self) {
        for path in self.level_paths.values_mut() {
            if let Some(name) = path.file_name().map(ToOwned::to_owned) {
                *path = self.output_dir.join(name);
            }
        }
        if let Some(name) = self.single_file_path.file_name().map(ToOwned::to_owned) {
            self.single_file_path = self.output_dir.join(name);
        }
    }
}

fn has_separator(name: &str) -> bool {
    name.contains('/') || name.contains('\\')
}

/// Filename component of an origin path, after the last `/` or `\`.
pub(crate) fn basename(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}
