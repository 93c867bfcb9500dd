//! Collection passes over a validated installation root.
//!
//! Each pass is synchronous and independent: logs, configs and hashes are
//! gathered in full before the bundler observes any of them. Recoverable
//! per-file failures are pushed onto the shared error list instead of
//! aborting a pass.

use std::fs;

use log::{debug, info, warn};

use crate::constants::LAUNCHER_INFO_FILE;
use crate::crashdump::CrashArtifact;
use crate::hash;
use crate::models::{FileHash, FileKind, FileRecord, Game};
use crate::paths::InstallRoot;
use crate::scanner;

/// What kinds of evidence the installation holds, probed up front so the run
/// can abort early when there is nothing to report.
#[derive(Debug, Clone, Copy)]
pub struct EvidencePresence {
    pub crashdumps: bool,
    pub t4_logs: bool,
    pub t5_logs: bool,
    pub t6_logs: bool,
}

impl EvidencePresence {
    pub fn any(&self) -> bool {
        self.crashdumps || self.t4_logs || self.t5_logs || self.t6_logs
    }
}

/// Probe for crash artifacts and per-title console logs.
pub fn detect_evidence(root: &InstallRoot) -> EvidencePresence {
    let crashdumps = fs::read_dir(root.crashdumps())
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);

    let has_console_logs = |game: Game| {
        fs::read_dir(root.main_dir(game))
            .map(|entries| {
                entries.flatten().any(|entry| {
                    entry
                        .file_name()
                        .to_string_lossy()
                        .starts_with(game.console_log_prefix())
                })
            })
            .unwrap_or(false)
    };

    let presence = EvidencePresence {
        crashdumps,
        t4_logs: has_console_logs(Game::T4),
        t5_logs: has_console_logs(Game::T5),
        t6_logs: has_console_logs(Game::T6),
    };
    info!(
        "Checked for log presence: crashdumps={} t4={} t5={} t6={}",
        presence.crashdumps, presence.t4_logs, presence.t5_logs, presence.t6_logs
    );
    presence
}

/// Collect the selected crash artifacts plus every log file in the title's
/// `storage/<code>/main` directory.
pub fn collect_logs(
    root: &InstallRoot,
    game: Game,
    crash_artifacts: &[CrashArtifact],
) -> Vec<FileRecord> {
    let mut logs = Vec::new();

    for artifact in crash_artifacts {
        let path = root.crashdumps().join(&artifact.file_name);
        match fs::metadata(&path) {
            Ok(metadata) => logs.push(FileRecord {
                path,
                size: metadata.len(),
                kind: FileKind::Crash,
            }),
            Err(err) => warn!("Crash artifact {} is gone: {}", path.display(), err),
        }
    }

    logs.extend(scanner::scan(
        &root.main_dir(game),
        FileKind::Log,
        scanner::is_log_file,
    ));

    info!("Collected {} logs", logs.len());
    logs
}

/// Collect the launcher metadata file, the competitive profile and every
/// `.cfg` under each title's storage directory. Only files that exist make
/// it into the result.
pub fn collect_configs(root: &InstallRoot) -> Vec<FileRecord> {
    let mut configs = Vec::new();

    let explicit = [
        root.as_path().join(LAUNCHER_INFO_FILE),
        root.storage_dir(Game::T5)
            .join("players")
            .join("competitive-t5.json"),
    ];
    for path in explicit {
        match fs::metadata(&path) {
            Ok(metadata) => configs.push(FileRecord {
                path,
                size: metadata.len(),
                kind: FileKind::Config,
            }),
            Err(_) => debug!("Optional config {} not present", path.display()),
        }
    }

    for game in Game::ALL {
        configs.extend(scanner::scan(
            &root.storage_dir(game),
            FileKind::Config,
            scanner::is_config_file,
        ));
    }

    info!("Found {} configs", configs.len());
    configs
}

/// Fingerprint the static file set under the installation's binary and
/// storage trees. Unreadable files are skipped and recorded on `errors`;
/// the pass itself never aborts. Results are sorted by relative path so the
/// manifest is deterministic for a given tree.
pub fn collect_hashes(root: &InstallRoot, errors: &mut Vec<String>) -> Vec<FileHash> {
    let mut hashes = Vec::new();

    for dir in [
        root.bin(),
        root.games(),
        root.launcher(),
        root.plugins(),
        root.storage(),
    ] {
        if !dir.is_dir() {
            continue;
        }
        for record in scanner::scan(&dir, FileKind::Static, scanner::is_static_file) {
            let rel = root.relative(&record.path);
            match hash::digest(&record.path) {
                Ok(digest) => hashes.push(FileHash {
                    path: rel,
                    hashes: digest,
                    size: record.size,
                }),
                Err(err) => {
                    warn!("Skipping unhashable file {}: {}", rel, err);
                    errors.push(format!("hash failed for {}: {}", rel, err));
                }
            }
        }
    }

    hashes.sort_by(|a, b| a.path.cmp(&b.path));
    info!("Collected {} hashes", hashes.len());
    hashes
}
