//! Stream-style builder: a caller-scoped accumulator that submits exactly
//! one record when it goes out of scope.

use std::fmt::{self, Display, Write as _};

use crate::levels::Level;
use crate::logger::Logger;
use crate::record::Record;

/// Accumulates message fragments and submits them as a single record on
/// drop. Created inactive when the level would be rejected, so appended
/// values cost nothing. An empty accumulator submits nothing.
pub struct LogStream<'a> {
    logger: &'a Logger,
    level: Level,
    file_path: String,
    function_name: String,
    line_number: u32,
    buffer: String,
    active: bool,
}

impl<'a> LogStream<'a> {
    pub(crate) fn new(
        logger: &'a Logger,
        level: Level,
        file_path: &str,
        function_name: &str,
        line_number: u32,
    ) -> Self {
        let active = logger.should_log(level);
        LogStream {
            logger,
            level,
            file_path: file_path.to_string(),
            function_name: function_name.to_string(),
            line_number,
            buffer: String::new(),
            active,
        }
    }

    /// Append one displayable value, chaining.
    pub fn append(mut self, value: impl Display) -> Self {
        if self.active {
            let _ = write!(self.buffer, "{value}");
        }
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl fmt::Write for LogStream<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.active {
            self.buffer.push_str(s);
        }
        Ok(())
    }
}

impl Drop for LogStream<'_> {
    fn drop(&mut self) {
        if self.active && !self.buffer.is_empty() {
            let record = Record::new(
                self.level,
                std::mem::take(&mut self.buffer),
                std::mem::take(&mut self.file_path),
                std::mem::take(&mut self.function_name),
                self.line_number,
            );
            self.logger.submit(record);
        }
        self.active = false;
    }
}
