//! File sink manager.
//!
//! Owns the per-level append streams and the optional unified stream, plus
//! the routing-path table the worker consults during dispatch. Everything in
//! here runs under the file lock; the paths are mirrored from the
//! configuration by the setters so dispatch never needs the configuration
//! lock.
//!
//! Two handle policies exist. Under ALWAYS_OPEN the streams live in the
//! table for the service's lifetime and writes hit the cached `BufWriter`
//! (capacity `max_buffer_size`); records at WARNING and above force a flush.
//! Under OPEN_ON_WRITE every write opens the target for append and closes
//! it again, so no handles persist between records.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use chrono::NaiveDate;

use crate::backend::format::format_record;
use crate::backend::rotation;
use crate::levels::{ALL_LEVELS, FileMode, Level};
use crate::logger::Core;
use crate::record::Record;

pub(crate) struct FileSinks {
    /// Routing table: level to target path. Mirrors the configuration.
    pub level_paths: AHashMap<Level, PathBuf>,
    /// Unified target path; empty while single-file output is off.
    pub single_path: PathBuf,
    /// Calendar day stamped at the first day-rotation consultation.
    pub last_rotate_day: Option<NaiveDate>,
    streams: AHashMap<Level, BufWriter<File>>,
    unified: Option<BufWriter<File>>,
}

impl FileSinks {
    pub fn new() -> Self {
        FileSinks {
            level_paths: AHashMap::new(),
            single_path: PathBuf::new(),
            last_rotate_day: None,
            streams: AHashMap::new(),
            unified: None,
        }
    }

    /// Replace the routing table with a fresh mirror of the configuration.
    pub fn set_routing(&mut self, level_paths: AHashMap<Level, PathBuf>, single_path: PathBuf) {
        self.level_paths = level_paths;
        self.single_path = single_path;
    }

    /// The path a record at `level` currently routes to.
    pub fn route_path(&self, single: bool, level: Level) -> Option<&PathBuf> {
        if single {
            (!self.single_path.as_os_str().is_empty()).then_some(&self.single_path)
        } else {
            self.level_paths.get(&level)
        }
    }

    /// Open an append stream for every path in the active routing set.
    /// A path that fails to open leaves its slot unset; writes to that
    /// level become no-ops until reconfigured.
    pub fn open_all(&mut self, core: &Core) {
        let buffer = core.max_buffer_size();
        if core.single_file_output() {
            if !self.single_path.as_os_str().is_empty() {
                ensure_parent_dir(core, &self.single_path);
                self.unified = open_append(&self.single_path, buffer);
            }
        } else {
            for level in ALL_LEVELS {
                let Some(path) = self.level_paths.get(&level).cloned() else {
                    continue;
                };
                ensure_parent_dir(core, &path);
                match open_append(&path, buffer) {
                    Some(stream) => {
                        self.streams.insert(level, stream);
                    }
                    None => {
                        self.streams.remove(&level);
                    }
                }
            }
        }
    }

    /// Close and reopen one level's stream after its path changed.
    pub fn reopen_level(&mut self, core: &Core, level: Level) {
        if let Some(mut old) = self.streams.remove(&level) {
            let _ = old.flush();
        }
        let Some(path) = self.level_paths.get(&level).cloned() else {
            return;
        };
        ensure_parent_dir(core, &path);
        if let Some(stream) = open_append(&path, core.max_buffer_size()) {
            self.streams.insert(level, stream);
        }
    }

    /// Detach the stream serving `level` (or the unified stream), flushing
    /// it first so rotation sees complete contents on disk.
    pub fn take_stream(&mut self, single: bool, level: Level) -> Option<BufWriter<File>> {
        let stream = if single {
            self.unified.take()
        } else {
            self.streams.remove(&level)
        };
        stream.map(|mut s| {
            let _ = s.flush();
            s
        })
    }

    /// Reinstall a freshly opened stream after rotation.
    pub fn install_stream(&mut self, single: bool, level: Level, stream: BufWriter<File>) {
        if single {
            self.unified = Some(stream);
        } else {
            self.streams.insert(level, stream);
        }
    }

    pub fn flush_all(&mut self) {
        if let Some(stream) = self.unified.as_mut() {
            let _ = stream.flush();
        }
        for stream in self.streams.values_mut() {
            let _ = stream.flush();
        }
    }

    pub fn close_all(&mut self) {
        self.flush_all();
        self.unified = None;
        self.streams.clear();
    }

    fn write_cached(&mut self, single: bool, level: Level, line: &str) {
        let stream = if single {
            self.unified.as_mut()
        } else {
            self.streams.get_mut(&level)
        };
        if let Some(stream) = stream {
            write_line(stream, line, level);
        }
    }
}

/// Deliver one record to its routed file, then consult the rotator.
pub(crate) fn write_to_file(core: &Core, record: &Record) {
    let line = format_record(record, false);
    let single = core.single_file_output();
    let check_level = if single { core.single_file_level() } else { record.level };

    let mut sinks = core.files.lock();
    match core.file_mode() {
        FileMode::AlwaysOpen => {
            sinks.write_cached(single, record.level, &line);
        }
        FileMode::OpenOnWrite => {
            let Some(path) = sinks.route_path(single, record.level).cloned() else {
                return;
            };
            ensure_parent_dir(core, &path);
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) {
                let _ = file.write_all(line.as_bytes());
                let _ = file.write_all(b"\n");
                if record.level >= Level::Warning {
                    let _ = file.flush();
                }
            }
        }
    }
    rotation::maybe_rotate(core, &mut sinks, check_level);
}

fn write_line(stream: &mut BufWriter<File>, line: &str, level: Level) {
    let _ = stream.write_all(line.as_bytes());
    let _ = stream.write_all(b"\n");
    if level >= Level::Warning {
        let _ = stream.flush();
    }
}

pub(crate) fn open_append(path: &Path, buffer: usize) -> Option<BufWriter<File>> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|file| BufWriter::with_capacity(buffer, file))
        .ok()
}

/// Create the target's parent directory if missing. Failure is reported
/// through the service itself and does not block the write; the following
/// open simply fails on its own.
pub(crate) fn ensure_parent_dir(core: &Core, path: &Path) {
    let Some(parent) = path.parent() else { return };
    if parent.as_os_str().is_empty() || parent.exists() {
        return;
    }
    if let Err(err) = fs::create_dir_all(parent) {
        if !parent.exists() {
            core.self_log_error(
                format!("failed to create directory {}: {}", parent.display(), err),
                file!(),
                line!(),
            );
        }
    }
}
