//! The log record: one entry as captured at the call site.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Local};

use crate::levels::Level;

/// A single log entry. Immutable once enqueued; the sequence number is
/// stamped by the logger at acceptance.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub message: String,
    /// Origin source file as given by the call site. May be empty.
    pub file_path: String,
    /// Origin function name. May be empty.
    pub function_name: String,
    /// Origin line, 0 when unknown.
    pub line_number: u32,
    /// Wall-clock instant captured at construction.
    pub timestamp: DateTime<Local>,
    /// Opaque id of the submitting thread.
    pub thread_id: u64,
    /// Monotonic id assigned at enqueue; 0 until accepted.
    pub sequence: u64,
}

impl Record {
    /// Build a record for the current thread, stamping the wall clock now.
    pub fn new(
        level: Level,
        message: impl Into<String>,
        file_path: impl Into<String>,
        function_name: impl Into<String>,
        line_number: u32,
    ) -> Self {
        Record {
            level,
            message: message.into(),
            file_path: file_path.into(),
            function_name: function_name.into(),
            line_number,
            timestamp: Local::now(),
            thread_id: current_thread_id(),
            sequence: 0,
        }
    }
}

/// Compact numeric id for the current thread. `ThreadId` has no stable
/// integer accessor, so hash it; the value only needs to be stable within
/// the process.
pub(crate) fn current_thread_id() -> u64 {
    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = Record::new(Level::Info, "hello", "src/main.rs", "main", 42);
        assert_eq!(record.level, Level::Info);
        assert_eq!(record.message, "hello");
        assert_eq!(record.line_number, 42);
        assert_eq!(record.sequence, 0);
        assert_ne!(record.thread_id, 0);
    }

    #[test]
    fn test_thread_id_stable_within_thread() {
        assert_eq!(current_thread_id(), current_thread_id());
    }

    #[test]
    fn test_thread_id_differs_across_threads() {
        let here = current_thread_id();
        let there = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(here, there);
    }
}
