//! The logging facade: lifecycle, configuration, submission, and metrics.
//!
//! `Logger` is a constructible handle around a shared core; the process-wide
//! instance lives behind [`logger()`]. Three locks protect the mutable
//! state, always acquired in the order configuration, file, queue when more
//! than one is held. Scalars the worker reads during dispatch (output mode,
//! file mode, routing flags, sizes, thresholds, lifecycle state) are plain
//! atomics, so dispatch runs without the configuration lock and observes
//! mode changes with eventual rather than immediate effect.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::backend::file::FileSinks;
use crate::backend::queue::RecordQueue;
use crate::backend::{rotation, worker};
use crate::config::{Config, DEFAULT_MAX_BUFFER_SIZE, DEFAULT_MAX_CACHE_SIZE, DEFAULT_MAX_LOG_SIZE, DEFAULT_OUTPUT_FILE, DEFAULT_SHUTDOWN_TIMEOUT_MS};
use crate::error::{Result, ZlogError};
use crate::levels::{ALL_LEVELS, DEFAULT_OUTPUT_MODE, FILE_OUT, FileMode, Level, OUTPUT_MODE_MASK, RotatePolicy};
use crate::record::Record;
use crate::stream::LogStream;

const STATE_UNINIT: u8 = 0;
const STATE_INITIALIZED: u8 = 1;
const STATE_STOPPING: u8 = 2;
const STATE_STOPPED: u8 = 3;

/// How long flush waits for the queue to empty.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Shared state behind a `Logger` handle. The worker thread holds its own
/// `Arc` so the core outlives the handle until the worker is joined.
pub(crate) struct Core {
    state: AtomicU8,
    stop_worker: AtomicBool,

    min_level: AtomicU8,
    output_mode: AtomicU8,
    file_mode: AtomicU8,
    rotate_policy: AtomicU8,
    single_file: AtomicBool,
    single_file_level: AtomicU8,
    max_log_size: AtomicU64,
    max_cache_size: AtomicUsize,
    max_buffer_size: AtomicUsize,

    config: Mutex<Config>,
    pub(crate) files: Mutex<FileSinks>,
    pub(crate) queue: RecordQueue,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Core {
    fn new() -> Self {
        Core {
            state: AtomicU8::new(STATE_UNINIT),
            stop_worker: AtomicBool::new(false),
            min_level: AtomicU8::new(Level::Info as u8),
            output_mode: AtomicU8::new(DEFAULT_OUTPUT_MODE),
            file_mode: AtomicU8::new(FileMode::AlwaysOpen as u8),
            rotate_policy: AtomicU8::new(RotatePolicy::Never as u8),
            single_file: AtomicBool::new(false),
            single_file_level: AtomicU8::new(Level::Info as u8),
            max_log_size: AtomicU64::new(DEFAULT_MAX_LOG_SIZE),
            max_cache_size: AtomicUsize::new(DEFAULT_MAX_CACHE_SIZE),
            max_buffer_size: AtomicUsize::new(DEFAULT_MAX_BUFFER_SIZE),
            config: Mutex::new(Config::default()),
            files: Mutex::new(FileSinks::new()),
            queue: RecordQueue::new(),
            worker: Mutex::new(None),
        }
    }

    fn state(&self) -> u8 {
        self.state.load(Ordering::Acquire)
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_worker.load(Ordering::Acquire)
    }

    pub(crate) fn stop_flag(&self) -> &AtomicBool {
        &self.stop_worker
    }

    pub(crate) fn output_mode(&self) -> u8 {
        self.output_mode.load(Ordering::Relaxed)
    }

    pub(crate) fn file_mode(&self) -> FileMode {
        FileMode::from_index(self.file_mode.load(Ordering::Relaxed))
    }

    pub(crate) fn rotate_policy(&self) -> RotatePolicy {
        RotatePolicy::from_index(self.rotate_policy.load(Ordering::Relaxed))
    }

    pub(crate) fn single_file_output(&self) -> bool {
        self.single_file.load(Ordering::Relaxed)
    }

    pub(crate) fn single_file_level(&self) -> Level {
        Level::from_index(self.single_file_level.load(Ordering::Relaxed))
    }

    pub(crate) fn max_log_size(&self) -> u64 {
        self.max_log_size.load(Ordering::Relaxed)
    }

    pub(crate) fn max_buffer_size(&self) -> usize {
        self.max_buffer_size.load(Ordering::Relaxed)
    }

    fn min_level(&self) -> Level {
        Level::from_index(self.min_level.load(Ordering::Relaxed))
    }

    fn should_log(&self, level: Level) -> bool {
        self.state() == STATE_INITIALIZED && level >= self.min_level()
    }

    fn submit(&self, record: Record) {
        if !self.should_log(record.level) {
            return;
        }
        self.queue.push(record, self.max_cache_size.load(Ordering::Relaxed));
    }

    fn log_direct(
        &self,
        level: Level,
        message: impl Into<String>,
        file_path: &str,
        function_name: &str,
        line_number: u32,
    ) {
        if !self.should_log(level) {
            return;
        }
        self.submit(Record::new(level, message, file_path, function_name, line_number));
    }

    /// Best-effort diagnostics about the service itself. Guarded on the
    /// Initialized state so bring-up and tear-down never re-enter the
    /// pipeline.
    pub(crate) fn self_log_error(&self, message: String, file_path: &'static str, line_number: u32) {
        if self.state() == STATE_INITIALIZED {
            self.log_direct(Level::Error, message, file_path, "", line_number);
        }
    }

    fn flush(&self) {
        let deadline = Instant::now() + FLUSH_TIMEOUT;
        loop {
            if self.queue.is_empty() {
                break;
            }
            if Instant::now() >= deadline {
                break;
            }
            self.queue.notify_one();
            thread::sleep(Duration::from_millis(1));
        }

        if self.file_mode() == FileMode::AlwaysOpen {
            self.files.lock().flush_all();
        }
    }

    fn shutdown(&self, timeout_ms: u64) {
        // Only the first caller transitions to Stopping; submissions are
        // rejected from this point on.
        if self
            .state
            .compare_exchange(STATE_INITIALIZED, STATE_STOPPING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.queue.is_empty() {
                break;
            }
            if Instant::now() >= deadline {
                self.queue.clear_dropping();
                break;
            }
            self.queue.notify_one();
            thread::sleep(Duration::from_millis(1));
        }

        self.stop_worker.store(true, Ordering::Release);
        self.queue.notify_one();
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }

        self.files.lock().close_all();
        self.state.store(STATE_STOPPED, Ordering::Release);
    }

    fn rotate_now(&self) {
        let mut sinks = self.files.lock();
        if self.single_file_output() {
            let level = self.single_file_level();
            if sinks.route_path(true, level).is_some_and(|p| p.exists()) {
                rotation::rotate_level(self, &mut sinks, level);
            }
        } else {
            for level in ALL_LEVELS {
                if sinks.route_path(false, level).is_some_and(|p| p.exists()) {
                    rotation::rotate_level(self, &mut sinks, level);
                }
            }
        }
    }
}

/// Handle to the logging service. Usually reached through [`logger()`];
/// constructible directly when an isolated instance is wanted, as in tests.
/// Dropping a handle runs a default-timeout shutdown.
pub struct Logger {
    core: Arc<Core>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub fn new() -> Self {
        Logger { core: Arc::new(Core::new()) }
    }

    /// Bring the service up: create the output directory, complete the
    /// default routing table, start the worker, and open files when streams
    /// are held open. Idempotent; calling on a running (or stopped) service
    /// succeeds without effect.
    pub fn initialize(&self) -> Result<()> {
        let mut config = self.core.config.lock();
        if self.core.state() != STATE_UNINIT {
            return Ok(());
        }

        let _ = fs::create_dir_all(&config.output_dir);
        config.fill_default_level_paths();
        {
            let mut sinks = self.core.files.lock();
            sinks.set_routing(config.level_paths.clone(), config.single_file_path.clone());
        }

        self.core.stop_worker.store(false, Ordering::Release);
        let worker_core = Arc::clone(&self.core);
        let handle = thread::Builder::new()
            .name("zlog-worker".to_string())
            .spawn(move || worker::run(worker_core))
            .map_err(|err| ZlogError::WorkerSpawn(err.to_string()))?;
        *self.core.worker.lock() = Some(handle);

        if self.core.output_mode() & FILE_OUT != 0 && self.core.file_mode() == FileMode::AlwaysOpen
        {
            let mut sinks = self.core.files.lock();
            sinks.open_all(&self.core);
        }

        self.core.state.store(STATE_INITIALIZED, Ordering::Release);
        drop(config);

        self.core
            .log_direct(Level::Debug, "logging service initialized", file!(), "initialize", line!());
        Ok(())
    }

    /// Enqueue a fully built record. Non-blocking except for the queue
    /// lock; rejected silently when the service is down or the level is
    /// below the threshold, and counted as dropped on overflow.
    pub fn submit(&self, record: Record) {
        self.core.submit(record);
    }

    /// Build and enqueue a record from call-site data.
    pub fn log_direct(
        &self,
        level: Level,
        message: impl Into<String>,
        file_path: &str,
        function_name: &str,
        line_number: u32,
    ) {
        self.core.log_direct(level, message, file_path, function_name, line_number);
    }

    /// Open a stream-style accumulator that submits once on drop.
    pub fn stream(
        &self,
        level: Level,
        file_path: &str,
        function_name: &str,
        line_number: u32,
    ) -> LogStream<'_> {
        LogStream::new(self, level, file_path, function_name, line_number)
    }

    /// True while the service is up and `level` clears the threshold. The
    /// macro front-end checks this before formatting arguments.
    pub fn should_log(&self, level: Level) -> bool {
        self.core.should_log(level)
    }

    pub fn is_initialized(&self) -> bool {
        self.core.state() == STATE_INITIALIZED
    }

    /// Best-effort: wait up to one second for the queue to empty, then
    /// flush any open streams. Concurrent submitters can keep the queue
    /// non-empty past the wait.
    pub fn flush(&self) {
        self.core.flush();
    }

    /// Stop accepting records, drain for at most `timeout_ms`, discard and
    /// count whatever remains, join the worker, and close files. Safe to
    /// call repeatedly.
    pub fn shutdown(&self, timeout_ms: u64) {
        self.core.shutdown(timeout_ms);
    }

    /// Rotate every file in the active routing set now, regardless of the
    /// configured policy.
    pub fn rotate_now(&self) {
        self.core.rotate_now();
    }

    pub fn set_program_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(ZlogError::EmptyProgramName);
        }
        self.core.config.lock().program_name = name.to_string();
        Ok(())
    }

    /// Move logging output to `dir`. Known per-level and unified paths are
    /// re-parented onto the new directory; on a running service the open
    /// files are closed and reopened there. Records already queued drain
    /// into whichever directory the routing table names at dispatch time.
    pub fn set_output_directory(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        if dir.as_os_str().is_empty() {
            return Err(ZlogError::EmptyPath);
        }

        let mut config = self.core.config.lock();
        if config.output_dir == dir {
            return Ok(());
        }
        config.output_dir = dir.to_path_buf();
        config.reparent_paths();

        if self.core.state() == STATE_INITIALIZED {
            let mut sinks = self.core.files.lock();
            sinks.close_all();
            if let Err(err) = fs::create_dir_all(&config.output_dir) {
                if !config.output_dir.exists() {
                    self.core.self_log_error(
                        format!(
                            "failed to create directory {}: {}",
                            config.output_dir.display(),
                            err
                        ),
                        file!(),
                        line!(),
                    );
                }
            }
            sinks.set_routing(config.level_paths.clone(), config.single_file_path.clone());
            if self.core.output_mode() & FILE_OUT != 0
                && self.core.file_mode() == FileMode::AlwaysOpen
            {
                sinks.open_all(&self.core);
            }
        }
        Ok(())
    }

    pub fn set_max_log_size(&self, size: u64) -> Result<()> {
        if size == 0 {
            return Err(ZlogError::ZeroSize("max_log_size"));
        }
        let _config = self.core.config.lock();
        self.core.max_log_size.store(size, Ordering::Relaxed);
        Ok(())
    }

    pub fn set_max_cache_size(&self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(ZlogError::ZeroSize("max_cache_size"));
        }
        let _config = self.core.config.lock();
        self.core.max_cache_size.store(size, Ordering::Relaxed);
        Ok(())
    }

    /// Buffer capacity for streams opened from here on; existing streams
    /// keep the capacity they were opened with.
    pub fn set_max_buffer_size(&self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(ZlogError::ZeroSize("max_buffer_size"));
        }
        let _config = self.core.config.lock();
        self.core.max_buffer_size.store(size, Ordering::Relaxed);
        Ok(())
    }

    /// Records strictly below `level` are rejected at submission.
    pub fn set_min_level(&self, level: Level) {
        let _config = self.core.config.lock();
        self.core.min_level.store(level as u8, Ordering::Relaxed);
    }

    /// Route `level` to `file_name`: a name carrying a path separator is
    /// used verbatim, a bare name lands under the output directory.
    pub fn set_level_file(&self, level: Level, file_name: &str) -> Result<()> {
        if file_name.is_empty() {
            return Err(ZlogError::EmptyPath);
        }

        let mut config = self.core.config.lock();
        let path = config.resolve_file_name(file_name);
        config.level_paths.insert(level, path.clone());

        if self.core.state() == STATE_INITIALIZED {
            let mut sinks = self.core.files.lock();
            sinks.level_paths.insert(level, path);
            if self.core.output_mode() & FILE_OUT != 0
                && self.core.file_mode() == FileMode::AlwaysOpen
                && !self.core.single_file_output()
            {
                sinks.reopen_level(&self.core, level);
            }
        }
        Ok(())
    }

    /// Set the sink mask and routing shape, adopting `level`'s configured
    /// path as the unified target when single-file output is enabled.
    pub fn set_output_mode(&self, mode: u8, single_file: bool, level: Level) -> Result<()> {
        if mode & !OUTPUT_MODE_MASK != 0 {
            return Err(ZlogError::InvalidOutputMode(mode));
        }

        let mut config = self.core.config.lock();
        self.core.output_mode.store(mode, Ordering::Relaxed);
        self.core.single_file.store(single_file, Ordering::Relaxed);
        self.core.single_file_level.store(level as u8, Ordering::Relaxed);
        if single_file {
            config.single_file_path = config
                .level_paths
                .get(&level)
                .cloned()
                .unwrap_or_else(|| config.output_dir.join(DEFAULT_OUTPUT_FILE));
        }
        self.apply_output_mode_change(&config);
        Ok(())
    }

    /// Like [`set_output_mode`](Self::set_output_mode), with an explicit
    /// unified path. An empty path falls back to the default unified file
    /// under the output directory.
    pub fn set_output_mode_with_path(
        &self,
        mode: u8,
        single_file: bool,
        file_path: &str,
    ) -> Result<()> {
        if mode & !OUTPUT_MODE_MASK != 0 {
            return Err(ZlogError::InvalidOutputMode(mode));
        }

        let mut config = self.core.config.lock();
        self.core.output_mode.store(mode, Ordering::Relaxed);
        self.core.single_file.store(single_file, Ordering::Relaxed);
        if single_file {
            config.single_file_path = if file_path.is_empty() {
                config.output_dir.join(DEFAULT_OUTPUT_FILE)
            } else {
                config.resolve_file_name(file_path)
            };
        }
        self.apply_output_mode_change(&config);
        Ok(())
    }

    fn apply_output_mode_change(&self, config: &Config) {
        if self.core.state() != STATE_INITIALIZED {
            return;
        }
        let mut sinks = self.core.files.lock();
        sinks.set_routing(config.level_paths.clone(), config.single_file_path.clone());
        sinks.close_all();
        if self.core.output_mode() & FILE_OUT != 0 && self.core.file_mode() == FileMode::AlwaysOpen
        {
            sinks.open_all(&self.core);
        }
    }

    pub fn set_file_mode(&self, mode: FileMode) {
        let _config = self.core.config.lock();
        let previous = self.core.file_mode();
        self.core.file_mode.store(mode as u8, Ordering::Relaxed);

        if self.core.state() == STATE_INITIALIZED && self.core.output_mode() & FILE_OUT != 0 {
            let mut sinks = self.core.files.lock();
            match (previous, mode) {
                (FileMode::AlwaysOpen, FileMode::OpenOnWrite) => sinks.close_all(),
                (FileMode::OpenOnWrite, FileMode::AlwaysOpen) => sinks.open_all(&self.core),
                _ => {}
            }
        }
    }

    pub fn set_rotate_policy(&self, policy: RotatePolicy) {
        let _config = self.core.config.lock();
        self.core.rotate_policy.store(policy as u8, Ordering::Relaxed);
    }

    pub fn program_name(&self) -> String {
        self.core.config.lock().program_name.clone()
    }

    pub fn output_directory(&self) -> PathBuf {
        self.core.config.lock().output_dir.clone()
    }

    /// The file currently routing `level`, if one is configured. Defaults
    /// are filled in at initialization.
    pub fn log_file_path(&self, level: Level) -> Option<PathBuf> {
        self.core.config.lock().level_paths.get(&level).cloned()
    }

    /// The unified target, present only while single-file output is on.
    pub fn unified_log_file_path(&self) -> Option<PathBuf> {
        if self.core.single_file_output() {
            Some(self.core.config.lock().single_file_path.clone())
        } else {
            None
        }
    }

    pub fn output_mode(&self) -> u8 {
        self.core.output_mode()
    }

    pub fn min_level(&self) -> Level {
        self.core.min_level()
    }

    pub fn file_mode(&self) -> FileMode {
        self.core.file_mode()
    }

    pub fn rotate_policy(&self) -> RotatePolicy {
        self.core.rotate_policy()
    }

    pub fn max_cache_size(&self) -> usize {
        self.core.max_cache_size.load(Ordering::Relaxed)
    }

    /// Snapshot of the pending-record count, taken under the queue lock.
    pub fn queue_size(&self) -> usize {
        self.core.queue.len()
    }

    /// Records accepted since construction. Always the sum of the
    /// per-level counts.
    pub fn total_logs(&self) -> u64 {
        self.core.queue.metrics().total()
    }

    pub fn level_logs(&self, level: Level) -> u64 {
        self.core.queue.metrics().level(level)
    }

    /// Records discarded to queue overflow plus residue cleared at
    /// shutdown.
    pub fn dropped_logs(&self) -> u64 {
        self.core.queue.metrics().dropped()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.core.shutdown(DEFAULT_SHUTDOWN_TIMEOUT_MS);
    }
}

static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// The process-wide logging service. Lazily constructed; still needs
/// [`Logger::initialize`] before it accepts records.
pub fn logger() -> &'static Logger {
    &LOGGER
}
