// Routing and file-handle policy tests.

use std::fs;

use tempfile::tempdir;

use super::{file_only_logger, read_lines};
use crate::{FILE_OUT, FileMode, Level, default_level_file};

#[test]
fn test_unified_output_collects_all_levels() {
    let dir = tempdir().unwrap();
    let logger = file_only_logger(dir.path());
    logger
        .set_output_mode_with_path(FILE_OUT, true, "all.log")
        .unwrap();
    logger.initialize().unwrap();

    logger.log_direct(Level::Info, "first", "f.c", "fn", 1);
    logger.log_direct(Level::Warning, "second", "f.c", "fn", 2);
    logger.log_direct(Level::Error, "third", "f.c", "fn", 3);
    logger.log_direct(Level::Fatal, "fourth", "f.c", "fn", 4);
    logger.shutdown(3000);

    let lines = read_lines(&dir.path().join("all.log"));
    assert_eq!(lines.len(), 4);
    for (line, message) in lines.iter().zip(["first", "second", "third", "fourth"]) {
        assert!(line.ends_with(&format!(" {message}")), "bad line: {line}");
    }

    // Split-file targets stay untouched in unified mode.
    for level in [Level::Info, Level::Warning, Level::Error, Level::Fatal] {
        let path = dir.path().join(default_level_file(level));
        assert!(!path.exists() || fs::metadata(&path).unwrap().len() == 0);
    }
    assert_eq!(
        logger.unified_log_file_path(),
        Some(dir.path().join("all.log"))
    );
}

#[test]
fn test_unified_path_adopted_from_level() {
    let dir = tempdir().unwrap();
    let logger = file_only_logger(dir.path());
    logger.set_output_mode(FILE_OUT, true, Level::Warning).unwrap();
    logger.initialize().unwrap();

    logger.log_direct(Level::Info, "routed to warning file", "f.c", "fn", 1);
    logger.shutdown(3000);

    // No explicit warning path was configured before single-file mode was
    // chosen, so the default unified file applies.
    let lines = read_lines(&dir.path().join("log.txt"));
    assert_eq!(lines.len(), 1);
}

#[test]
fn test_open_on_write_keeps_no_handles_and_loses_nothing() {
    let dir = tempdir().unwrap();
    let logger = file_only_logger(dir.path());
    logger.set_file_mode(FileMode::OpenOnWrite);
    logger.set_max_cache_size(20_000).unwrap();
    logger.initialize().unwrap();

    const COUNT: usize = 10_000;
    for i in 0..COUNT {
        logger.log_direct(Level::Info, format!("entry {i}"), "f.c", "fn", 0);
    }
    logger.shutdown(60_000);

    let lines = read_lines(&dir.path().join("info_log.txt"));
    assert_eq!(lines.len(), COUNT);
    assert!(lines[0].ends_with(" entry 0"));
    assert!(lines[COUNT - 1].ends_with(&format!(" entry {}", COUNT - 1)));

    // Levels that saw no traffic never had their files created.
    assert!(!dir.path().join("error_log.txt").exists());
}

#[test]
fn test_level_file_override() {
    let dir = tempdir().unwrap();
    let logger = file_only_logger(dir.path());
    logger.set_level_file(Level::Info, "app_events.txt").unwrap();
    logger.initialize().unwrap();

    logger.log_direct(Level::Info, "redirected", "f.c", "fn", 1);
    logger.shutdown(3000);

    let lines = read_lines(&dir.path().join("app_events.txt"));
    assert_eq!(lines.len(), 1);
    assert_eq!(read_lines(&dir.path().join("info_log.txt")).len(), 0);
}

#[test]
fn test_level_file_override_while_running() {
    let dir = tempdir().unwrap();
    let logger = file_only_logger(dir.path());
    logger.initialize().unwrap();

    logger.log_direct(Level::Info, "old home", "f.c", "fn", 1);
    logger.flush();
    // The queue is empty after flush; give the in-flight batch a moment.
    std::thread::sleep(std::time::Duration::from_millis(50));

    logger.set_level_file(Level::Info, "moved.txt").unwrap();
    logger.log_direct(Level::Info, "new home", "f.c", "fn", 2);
    logger.shutdown(3000);

    assert_eq!(read_lines(&dir.path().join("info_log.txt")).len(), 1);
    let moved = read_lines(&dir.path().join("moved.txt"));
    assert_eq!(moved.len(), 1);
    assert!(moved[0].ends_with(" new home"));
}

#[test]
fn test_output_directory_change_reparents_files() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");

    let logger = file_only_logger(&first);
    logger.initialize().unwrap();
    logger.log_direct(Level::Info, "in first", "f.c", "fn", 1);
    logger.flush();
    std::thread::sleep(std::time::Duration::from_millis(50));

    logger.set_output_directory(&second).unwrap();
    logger.log_direct(Level::Info, "in second", "f.c", "fn", 2);
    logger.shutdown(3000);

    assert_eq!(read_lines(&first.join("info_log.txt")).len(), 1);
    let relocated = read_lines(&second.join("info_log.txt"));
    assert_eq!(relocated.len(), 1);
    assert!(relocated[0].ends_with(" in second"));
}

#[test]
fn test_console_only_mode_writes_no_files() {
    let dir = tempdir().unwrap();
    let logger = file_only_logger(dir.path());
    logger.set_output_mode(0, false, Level::Info).unwrap();
    logger.initialize().unwrap();

    logger.log_direct(Level::Info, "nowhere to land", "f.c", "fn", 1);
    logger.shutdown(3000);

    assert!(!dir.path().join("info_log.txt").exists());
    // Accepted regardless: acceptance counts submissions, not deliveries.
    assert_eq!(logger.total_logs(), 1);
}

#[test]
fn test_file_mode_switch_while_running() {
    let dir = tempdir().unwrap();
    let logger = file_only_logger(dir.path());
    logger.initialize().unwrap();

    logger.log_direct(Level::Warning, "held open", "f.c", "fn", 1);
    logger.flush();
    std::thread::sleep(std::time::Duration::from_millis(50));

    logger.set_file_mode(FileMode::OpenOnWrite);
    logger.log_direct(Level::Warning, "opened per write", "f.c", "fn", 2);
    logger.shutdown(3000);

    let lines = read_lines(&dir.path().join("warning_log.txt"));
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with(" opened per write"));
}
