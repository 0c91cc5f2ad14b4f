// Pipeline tests against temp-dir-backed loggers. Console delivery stays
// off so test output holds only the harness's own lines.

mod sink_tests;

use std::path::Path;

use crate::{FILE_OUT, Level, Logger};

/// A fresh instance routing to `dir`, file sink only.
pub(crate) fn file_only_logger(dir: &Path) -> Logger {
    let logger = Logger::new();
    logger.set_output_directory(dir).unwrap();
    logger.set_output_mode(FILE_OUT, false, Level::Info).unwrap();
    logger
}

pub(crate) fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Pull the `#<sequence>` value out of a formatted line.
pub(crate) fn extract_sequence(line: &str) -> Option<u64> {
    line.split(" #").nth(1)?.split(' ').next()?.parse().ok()
}
