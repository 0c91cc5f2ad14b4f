//! Error types for configuration validation.
//!
//! The logging pipeline itself never surfaces errors to callers; only the
//! configuration setters are fallible, and they reject bad input without
//! changing state.

use std::fmt;

/// Errors returned by the configuration setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZlogError {
    /// The program name must be non-empty.
    EmptyProgramName,
    /// A file or directory path argument was empty.
    EmptyPath,
    /// A size or capacity argument was zero; the named field says which.
    ZeroSize(&'static str),
    /// The output-mode bitmask contained bits outside the known set.
    InvalidOutputMode(u8),
    /// The background worker thread could not be started.
    WorkerSpawn(String),
}

impl fmt::Display for ZlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZlogError::EmptyProgramName => write!(f, "program name must not be empty"),
            ZlogError::EmptyPath => write!(f, "path must not be empty"),
            ZlogError::ZeroSize(field) => write!(f, "{} must be greater than zero", field),
            ZlogError::InvalidOutputMode(mode) => {
                write!(f, "output mode {:#04x} contains unknown bits", mode)
            }
            ZlogError::WorkerSpawn(details) => {
                write!(f, "failed to start the background worker: {}", details)
            }
        }
    }
}

impl std::error::Error for ZlogError {}

/// Result alias for configuration operations.
pub type Result<T> = std::result::Result<T, ZlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ZlogError::ZeroSize("max_log_size").to_string(),
            "max_log_size must be greater than zero"
        );
        assert!(ZlogError::InvalidOutputMode(0x40).to_string().contains("0x40"));
    }
}
