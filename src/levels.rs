//! Severity levels, output-mode bits, and sink policies.
//!
//! `Level` is totally ordered by ascending severity, so threshold checks are
//! plain comparisons. The output mode is a small bitmask combining console,
//! file, and color delivery.

/// Log severity, ordered from most verbose to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
}

/// Number of distinct severity levels.
pub const LEVEL_COUNT: usize = 6;

/// All levels in ascending severity order.
pub const ALL_LEVELS: [Level; LEVEL_COUNT] = [
    Level::Trace,
    Level::Debug,
    Level::Info,
    Level::Warning,
    Level::Error,
    Level::Fatal,
];

impl Level {
    /// Uppercase display name used in formatted lines.
    pub fn name(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// ANSI escape prefix for colorized console output.
    pub fn color_code(self) -> &'static str {
        match self {
            Level::Trace => "\x1b[90m",
            Level::Debug => "\x1b[36m",
            Level::Info => "\x1b[32m",
            Level::Warning => "\x1b[33m",
            Level::Error => "\x1b[31m",
            Level::Fatal => "\x1b[35m",
        }
    }

    /// Parse a level name, case-insensitive, accepting the `warn` alias.
    pub fn from_name(name: &str) -> Option<Level> {
        match name.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warning),
            "error" => Some(Level::Error),
            "fatal" => Some(Level::Fatal),
            _ => None,
        }
    }

    pub(crate) fn from_index(index: u8) -> Level {
        ALL_LEVELS[(index as usize).min(LEVEL_COUNT - 1)]
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// ANSI reset suffix closing a colorized line.
pub const COLOR_RESET: &str = "\x1b[0m";

/// Deliver formatted lines to standard output / standard error.
pub const CONSOLE_OUT: u8 = 1 << 0;
/// Deliver formatted lines to the routed log files.
pub const FILE_OUT: u8 = 1 << 2;
/// Wrap console lines in per-level ANSI colors. Files are never colorized.
pub const COLOR_OUT: u8 = 1 << 3;

/// Console, file, and colorized console all enabled.
pub const DEFAULT_OUTPUT_MODE: u8 = CONSOLE_OUT | FILE_OUT | COLOR_OUT;

pub(crate) const OUTPUT_MODE_MASK: u8 = CONSOLE_OUT | FILE_OUT | COLOR_OUT;

/// How file sinks manage their underlying handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FileMode {
    /// Streams are opened at initialization and held for the service's
    /// lifetime, subject to rotation reopens.
    AlwaysOpen = 0,
    /// Every write opens the target for append, writes, and closes.
    OpenOnWrite = 1,
}

impl FileMode {
    pub(crate) fn from_index(index: u8) -> FileMode {
        match index {
            1 => FileMode::OpenOnWrite,
            _ => FileMode::AlwaysOpen,
        }
    }
}

/// When log files are rotated to a timestamped backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RotatePolicy {
    /// Never rotate.
    Never = 0,
    /// Rotate once the file on disk reaches the configured maximum size.
    Size = 1,
    /// Rotate on the first write after the local calendar day changes.
    Time = 2,
    /// Synonym for [`RotatePolicy::Time`].
    Daily = 3,
}

impl RotatePolicy {
    pub(crate) fn from_index(index: u8) -> RotatePolicy {
        match index {
            1 => RotatePolicy::Size,
            2 => RotatePolicy::Time,
            3 => RotatePolicy::Daily,
            _ => RotatePolicy::Never,
        }
    }

    /// Both time variants rotate on calendar-day change.
    pub(crate) fn is_daily(self) -> bool {
        matches!(self, RotatePolicy::Time | RotatePolicy::Daily)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_level_from_name() {
        assert_eq!(Level::from_name("trace"), Some(Level::Trace));
        assert_eq!(Level::from_name("INFO"), Some(Level::Info));
        assert_eq!(Level::from_name("warn"), Some(Level::Warning));
        assert_eq!(Level::from_name("WARNING"), Some(Level::Warning));
        assert_eq!(Level::from_name("fatal"), Some(Level::Fatal));
        assert_eq!(Level::from_name("invalid"), None);
    }

    #[test]
    fn test_level_round_trip() {
        for level in ALL_LEVELS {
            assert_eq!(Level::from_index(level as u8), level);
            assert_eq!(Level::from_name(level.name()), Some(level));
        }
    }

    #[test]
    fn test_output_mode_bits_distinct() {
        assert_eq!(CONSOLE_OUT & FILE_OUT, 0);
        assert_eq!(CONSOLE_OUT & COLOR_OUT, 0);
        assert_eq!(FILE_OUT & COLOR_OUT, 0);
        assert_eq!(DEFAULT_OUTPUT_MODE, CONSOLE_OUT | FILE_OUT | COLOR_OUT);
    }

    #[test]
    fn test_rotate_policy_day_synonyms() {
        assert!(RotatePolicy::Time.is_daily());
        assert!(RotatePolicy::Daily.is_daily());
        assert!(!RotatePolicy::Size.is_daily());
        assert!(!RotatePolicy::Never.is_daily());
    }
}
