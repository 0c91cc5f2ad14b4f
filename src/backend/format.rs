//! Record-to-line rendering.
//!
//! One record becomes one line of the shape
//! `[timestamp] [LEVEL] [thread] [basename:line] [function] #sequence message`.
//! The line suffix, function segment, and sequence segment are omitted when
//! their value is unknown. Color wrapping applies to console delivery only.

use std::fmt::Write as _;

use crate::config::basename;
use crate::levels::COLOR_RESET;
use crate::record::Record;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Render one record. The result carries no trailing newline; sinks append
/// their own line terminator.
pub(crate) fn format_record(record: &Record, use_color: bool) -> String {
    let mut out = String::with_capacity(128 + record.message.len());

    if use_color {
        out.push_str(record.level.color_code());
    }

    let _ = write!(
        out,
        "[{}] [{}] [{}] [{}",
        record.timestamp.format(TIMESTAMP_FORMAT),
        record.level.name(),
        record.thread_id,
        basename(&record.file_path),
    );
    if record.line_number > 0 {
        let _ = write!(out, ":{}", record.line_number);
    }
    out.push(']');

    if !record.function_name.is_empty() {
        let _ = write!(out, " [{}]", record.function_name);
    }
    if record.sequence > 0 {
        let _ = write!(out, " #{}", record.sequence);
    }

    out.push(' ');
    out.push_str(&record.message);

    if use_color {
        out.push_str(COLOR_RESET);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::Level;
    use regex::Regex;

    const LINE_PATTERN: &str = r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}\] \[(TRACE|DEBUG|INFO|WARNING|ERROR|FATAL)\] \[[^\]]+\] \[[^\]]*(:\d+)?\]( \[[^\]]+\])?( #\d+)? .*$";

    fn sample(level: Level, line: u32, function: &str, sequence: u64) -> Record {
        let mut record = Record::new(level, "something happened", "src/engine/run.rs", function, line);
        record.sequence = sequence;
        record
    }

    #[test]
    fn test_full_line_shape() {
        let record = sample(Level::Info, 42, "run", 7);
        let line = format_record(&record, false);
        assert!(line.contains("] [INFO] ["));
        assert!(line.contains("[run.rs:42]"));
        assert!(line.contains(" [run]"));
        assert!(line.contains(" #7 "));
        assert!(line.ends_with(" something happened"));
    }

    #[test]
    fn test_line_number_omitted_when_zero() {
        let line = format_record(&sample(Level::Debug, 0, "run", 1), false);
        assert!(line.contains("[run.rs]"));
        assert!(!line.contains("run.rs:"));
    }

    #[test]
    fn test_function_omitted_when_empty() {
        let line = format_record(&sample(Level::Debug, 10, "", 1), false);
        assert!(line.contains("[run.rs:10] #1 "));
    }

    #[test]
    fn test_sequence_omitted_when_zero() {
        let line = format_record(&sample(Level::Debug, 10, "run", 0), false);
        assert!(!line.contains('#'));
    }

    #[test]
    fn test_color_wrapping() {
        let record = sample(Level::Error, 3, "run", 2);
        let colored = format_record(&record, true);
        assert!(colored.starts_with("\x1b[31m"));
        assert!(colored.ends_with(COLOR_RESET));

        let plain = format_record(&record, false);
        assert!(!plain.contains('\x1b'));
    }

    #[test]
    fn test_matches_line_grammar() {
        let pattern = Regex::new(LINE_PATTERN).unwrap();
        for (line_number, function, sequence) in
            [(42, "run", 7), (0, "run", 7), (42, "", 7), (42, "run", 0), (0, "", 0)]
        {
            let record = sample(Level::Warning, line_number, function, sequence);
            let line = format_record(&record, false);
            assert!(pattern.is_match(&line), "no match: {line}");
        }
    }

    #[test]
    fn test_millisecond_padding() {
        let record = sample(Level::Info, 1, "run", 1);
        let line = format_record(&record, false);
        let stamp = &line[1..line.find(']').unwrap()];
        let millis = stamp.rsplit('.').next().unwrap();
        assert_eq!(millis.len(), 3);
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
    }
}
