use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::ReportError;

/// The closed set of game titles a Plutonium installation can host.
///
/// Each title owns a storage directory named after its two-character code
/// (`storage/t4`, `storage/t5`, `storage/t6`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    T4,
    T5,
    T6,
}

impl Game {
    pub const ALL: [Game; 3] = [Game::T4, Game::T5, Game::T6];

    /// Two-character code used in storage paths and crash-artifact names.
    pub fn code(&self) -> &'static str {
        match self {
            Game::T4 => "t4",
            Game::T5 => "t5",
            Game::T6 => "t6",
        }
    }

    /// Human-readable title shown in selection menus.
    pub fn title(&self) -> &'static str {
        match self {
            Game::T4 => "Call of Duty: World at War",
            Game::T5 => "Call of Duty: Black Ops",
            Game::T6 => "Call of Duty: Black Ops II",
        }
    }

    /// File-name prefix of the console log written by this title.
    pub fn console_log_prefix(&self) -> &'static str {
        match self {
            Game::T4 | Game::T5 => "console.log",
            Game::T6 => "console_zm.log",
        }
    }

    /// Exhaustive lookup from a two-character code. Unrecognized codes are a
    /// recoverable error, never a panic.
    pub fn from_code(code: &str) -> Result<Game, ReportError> {
        match code {
            "t4" => Ok(Game::T4),
            "t5" => Ok(Game::T5),
            "t6" => Ok(Game::T6),
            other => Err(ReportError::UnknownTitle(other.to_string())),
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Classification tag attached to every scanned file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Static,
    Config,
    Log,
    Crash,
}

/// A file selected for the evidence bundle. Produced by the scanner (or by
/// crash-artifact selection) and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub kind: FileKind,
}

/// The three content digests computed over one identical byte stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContentDigest {
    pub crc32: String,
    pub sha1: String,
    pub sha256: String,
}

/// Manifest entry for one fingerprinted static file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileHash {
    pub path: String,
    pub hashes: ContentDigest,
    pub size: u64,
}
