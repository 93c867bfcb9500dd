use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::models::{FileKind, FileRecord};

/// Lazily walk `dir` depth-first and yield every file that passes
/// `predicate`, tagged with `kind`.
///
/// Directories are expanded but never yielded themselves. Per-directory order
/// is whatever the OS returns; no ordering is guaranteed across runs. A
/// missing `dir` produces an empty sequence rather than an error, and files
/// that disappear between enumeration and `stat` (a race with concurrent
/// writers) are skipped without aborting the scan. The sequence is not
/// restartable: every call opens directory handles fresh.
pub fn scan<P>(dir: &Path, kind: FileKind, predicate: P) -> impl Iterator<Item = FileRecord>
where
    P: Fn(&Path) -> bool,
{
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(move |entry| predicate(entry.path()))
        .filter_map(move |entry| match entry.metadata() {
            Ok(metadata) => Some(FileRecord {
                path: entry.into_path(),
                size: metadata.len(),
                kind,
            }),
            Err(err) => {
                debug!("File vanished during scan: {}", err);
                None
            }
        })
}

/// Default predicate for the fingerprinting pass.
///
/// Excludes anything under a `crashdumps` or `demos` directory, anything with
/// a `.cfg` extension, and anything whose name contains `.log`; those files
/// are collected through their own dedicated passes.
pub fn is_static_file(path: &Path) -> bool {
    if path
        .components()
        .any(|c| c.as_os_str() == "crashdumps" || c.as_os_str() == "demos")
    {
        return false;
    }
    if path.extension().map_or(false, |ext| ext == "cfg") {
        return false;
    }
    if path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.contains(".log"))
    {
        return false;
    }
    true
}

/// Predicate for per-title log collection: any file whose name contains
/// `.log` (covers rotated variants like `console.log.old`).
pub fn is_log_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.contains(".log"))
}

/// Predicate for config collection.
pub fn is_config_file(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "cfg")
}
