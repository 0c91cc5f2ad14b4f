//! Rotation: size and calendar-day policies, backup naming, and the
//! rename-or-copy fallback. Every entry point runs under the file lock, so
//! rotations never overlap.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::backend::file::{FileSinks, open_append};
use crate::levels::{FileMode, Level, RotatePolicy};
use crate::logger::Core;

/// Backup name for a rotated file: `<stem>_YYYYMMDD_HHMMSS<ext>` next to
/// the original.
pub(crate) fn rotated_file_name(path: &Path, now: DateTime<Local>) -> PathBuf {
    let stamp = now.format("%Y%m%d_%H%M%S");
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("log");
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => path.with_file_name(format!("{stem}_{stamp}.{ext}")),
        None => path.with_file_name(format!("{stem}_{stamp}")),
    }
}

/// Consult the policy for the path a record at `level` routed to, rotating
/// when due. Called after every file write.
pub(crate) fn maybe_rotate(core: &Core, sinks: &mut FileSinks, level: Level) {
    if should_rotate(core, sinks, level) {
        rotate_level(core, sinks, level);
        if core.rotate_policy().is_daily() {
            sinks.last_rotate_day = Some(Local::now().date_naive());
        }
    }
}

fn should_rotate(core: &Core, sinks: &mut FileSinks, level: Level) -> bool {
    let policy = core.rotate_policy();
    if policy == RotatePolicy::Never {
        return false;
    }
    let single = core.single_file_output();
    let Some(path) = sinks.route_path(single, level).cloned() else {
        return false;
    };

    match policy {
        RotatePolicy::Size => file_size(&path) >= core.max_log_size(),
        RotatePolicy::Time | RotatePolicy::Daily => {
            let today = Local::now().date_naive();
            match sinks.last_rotate_day {
                // First consultation stamps the day without rotating.
                None => {
                    sinks.last_rotate_day = Some(today);
                    false
                }
                Some(day) => day != today,
            }
        }
        RotatePolicy::Never => false,
    }
}

/// Rotate the path a record at `level` routes to: flush and close the
/// cached stream, move the file aside under a timestamped name, and reopen
/// in place when streams are held open. On any fallback failure the
/// rotation is abandoned and the original file stays put.
pub(crate) fn rotate_level(core: &Core, sinks: &mut FileSinks, level: Level) {
    let single = core.single_file_output();
    let Some(path) = sinks.route_path(single, level).cloned() else {
        return;
    };

    // Dropping the detached stream closes the handle before the rename.
    drop(sinks.take_stream(single, level));

    let backup = rotated_file_name(&path, Local::now());
    if fs::rename(&path, &backup).is_err() {
        copy_then_truncate(core, &path, &backup);
    }

    if core.file_mode() == FileMode::AlwaysOpen {
        match open_append(&path, core.max_buffer_size()) {
            Some(stream) => sinks.install_stream(single, level, stream),
            None => core.self_log_error(
                format!("failed to reopen {} after rotation", path.display()),
                file!(),
                line!(),
            ),
        }
    }
}

/// Cross-device (or otherwise refused) rename fallback: copy the contents
/// to the backup path, then truncate the source in place.
fn copy_then_truncate(core: &Core, path: &Path, backup: &Path) {
    if let Err(err) = fs::copy(path, backup) {
        core.self_log_error(
            format!(
                "failed to copy {} to {} for rotation: {}",
                path.display(),
                backup.display(),
                err
            ),
            file!(),
            line!(),
        );
        return;
    }
    if let Err(err) = File::create(path) {
        core.self_log_error(
            format!("failed to truncate {} after rotation copy: {}", path.display(), err),
            file!(),
            line!(),
        );
    }
}

fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|meta| meta.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_rotated_file_name_keeps_extension() {
        let now = Local::now();
        let rotated = rotated_file_name(Path::new("/var/log/app/info_log.txt"), now);
        let name = rotated.file_name().unwrap().to_str().unwrap();
        let pattern = Regex::new(r"^info_log_\d{8}_\d{6}\.txt$").unwrap();
        assert!(pattern.is_match(name), "unexpected name: {name}");
        assert_eq!(rotated.parent(), Some(Path::new("/var/log/app")));
    }

    #[test]
    fn test_rotated_file_name_without_extension() {
        let now = Local::now();
        let rotated = rotated_file_name(Path::new("./zlog/journal"), now);
        let name = rotated.file_name().unwrap().to_str().unwrap();
        let pattern = Regex::new(r"^journal_\d{8}_\d{6}$").unwrap();
        assert!(pattern.is_match(name), "unexpected name: {name}");
    }

    #[test]
    fn test_file_size_missing_path_is_zero() {
        assert_eq!(file_size(Path::new("/nonexistent/zlog/nothing.txt")), 0);
    }
}
