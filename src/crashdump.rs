//! Crash-artifact filename parsing and incident correlation.
//!
//! The launcher writes every crash artifact into a flat `crashdumps`
//! directory, encoding revision, title and wall-clock time into the file
//! name:
//!
//! ```text
//! plutonium-r4035-t6zm-2024-03-01_10-30-05.dmp
//! plutonium-r4035-t6zm-2024-03-01_10-30-05-minimal.dmp
//! plutonium-r4035-t6zm-2024-03-01_10-30-05.txt
//! ```
//!
//! All artifacts of one crash event share the name prefix up to and
//! including the seconds component; that prefix is the session key used for
//! grouping. Selecting a key matches by substring containment rather than
//! exact equality so that suffixed variants written moments later stay in
//! the same incident.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::errors::ReportError;
use crate::models::Game;

lazy_static! {
    // ASCII word characters only: the title code is byte-sliced out of the
    // token, and launcher-written names never leave ASCII.
    static ref CRASH_NAME: Regex = Regex::new(
        r"(plutonium-r([0-9]{4,5})-(t[0-9A-Za-z_]{3})-([0-9]{4})-([0-9]{2})-([0-9]{2})_([0-9]{2})-([0-9]{2})-([0-9]{2}))"
    )
    .unwrap();
}

/// What kind of dump a crash artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpKind {
    FullDump,
    MiniDump,
    TextDump,
}

/// One parsed crash-directory file name.
#[derive(Debug, Clone)]
pub struct CrashArtifact {
    pub revision: String,
    pub title_token: String,
    pub timestamp: NaiveDateTime,
    pub session_key: String,
    pub kind: DumpKind,
    pub file_name: String,
}

impl CrashArtifact {
    /// Parse a crash-directory file name. Returns `None` for names that do
    /// not follow the artifact grammar; those are simply not crash artifacts
    /// and never enter correlation.
    pub fn parse(file_name: &str) -> Option<CrashArtifact> {
        let caps = CRASH_NAME.captures(file_name)?;

        let field = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();
        let number = |i: usize| field(i).parse::<u32>().ok();

        let timestamp = NaiveDate::from_ymd_opt(
            field(4).parse::<i32>().ok()?,
            number(5)?,
            number(6)?,
        )?
        .and_hms_opt(number(7)?, number(8)?, number(9)?)?;

        let kind = if file_name.ends_with(".txt") {
            DumpKind::TextDump
        } else if file_name.contains("minimal") {
            DumpKind::MiniDump
        } else {
            DumpKind::FullDump
        };

        Some(CrashArtifact {
            revision: field(2).to_string(),
            title_token: field(3).to_string(),
            timestamp,
            session_key: field(1).to_string(),
            kind,
            file_name: file_name.to_string(),
        })
    }

    /// Two-character title code, the leading characters of the title token
    /// (`t6zm` -> `t6`).
    pub fn title_code(&self) -> &str {
        &self.title_token[..2]
    }

    /// Resolve the title through the closed lookup.
    pub fn game(&self) -> Result<Game, ReportError> {
        Game::from_code(self.title_code())
    }

    /// Rebuild the session key from the parsed fields. Matches the stored
    /// key for every name the grammar accepts.
    pub fn derive_session_key(&self) -> String {
        format!(
            "plutonium-r{}-{}-{}",
            self.revision,
            self.title_token,
            self.timestamp.format("%Y-%m-%d_%H-%M-%S")
        )
    }

    /// Whether this artifact belongs to the session identified by `key`.
    /// Containment, not equality: a key selects every artifact whose own
    /// session key embeds it.
    pub fn matches_session(&self, key: &str) -> bool {
        self.session_key.contains(key)
    }
}

/// A non-empty group of crash artifacts sharing one session key.
#[derive(Debug, Clone)]
pub struct IncidentSession {
    key: String,
    artifacts: Vec<CrashArtifact>,
}

impl IncidentSession {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn artifacts(&self) -> &[CrashArtifact] {
        &self.artifacts
    }

    /// The single title this incident resolves to. Resolution is deferred to
    /// this point so that artifacts with an unrecognized title code still
    /// correlate; callers drop the session (recoverable) when the lookup
    /// fails.
    pub fn game(&self) -> Result<Game, ReportError> {
        self.artifacts[0].game()
    }
}

/// All crash artifacts parsed out of one crash directory.
pub struct CrashdumpIndex {
    artifacts: Vec<CrashArtifact>,
}

impl CrashdumpIndex {
    /// Read `dir` (non-recursively) and parse every entry that follows the
    /// artifact grammar. A missing directory yields an empty index.
    pub fn from_dir(dir: &Path) -> CrashdumpIndex {
        let mut artifacts = Vec::new();
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().to_string();
                match CrashArtifact::parse(&name) {
                    Some(artifact) => artifacts.push(artifact),
                    None => debug!("Not a crash artifact, ignoring: {}", name),
                }
            }
        }
        CrashdumpIndex { artifacts }
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Distinct session keys in first-seen order, one entry per incident.
    pub fn session_keys(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.artifacts
            .iter()
            .map(|artifact| artifact.session_key.as_str())
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// All artifacts whose session key contains `key`. Returns `None` when
    /// nothing matches.
    pub fn select(&self, key: &str) -> Option<IncidentSession> {
        let artifacts: Vec<CrashArtifact> = self
            .artifacts
            .iter()
            .filter(|artifact| artifact.matches_session(key))
            .cloned()
            .collect();
        if artifacts.is_empty() {
            None
        } else {
            Some(IncidentSession {
                key: key.to_string(),
                artifacts,
            })
        }
    }
}
