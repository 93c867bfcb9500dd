use std::path::{Path, PathBuf};

use crate::constants::REQUIRED_ROOT_DIRS;
use crate::errors::ReportError;
use crate::models::Game;

/// Validated root of a Plutonium installation.
///
/// Constructed once at startup and passed by reference to every component
/// that derives paths from it; nothing mutates it after [`resolve`] succeeds.
///
/// [`resolve`]: InstallRoot::resolve
#[derive(Debug, Clone)]
pub struct InstallRoot {
    root: PathBuf,
}

impl InstallRoot {
    /// Validate `root` and wrap it. Fails if the directory itself or any of
    /// the required `bin`, `games`, `launcher`, `storage` subdirectories is
    /// missing.
    pub fn resolve(root: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ReportError::RootNotFound(root));
        }
        for sub in REQUIRED_ROOT_DIRS.iter().copied() {
            if !root.join(sub).is_dir() {
                return Err(ReportError::InvalidRoot {
                    path: root,
                    missing: sub,
                });
            }
        }
        Ok(Self { root })
    }

    pub fn as_path(&self) -> &Path {
        &self.root
    }

    pub fn bin(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn crashdumps(&self) -> PathBuf {
        self.root.join("crashdumps")
    }

    pub fn games(&self) -> PathBuf {
        self.root.join("games")
    }

    pub fn launcher(&self) -> PathBuf {
        self.root.join("launcher")
    }

    pub fn plugins(&self) -> PathBuf {
        self.root.join("plugins")
    }

    pub fn storage(&self) -> PathBuf {
        self.root.join("storage")
    }

    /// Per-title storage directory, `storage/<code>`.
    pub fn storage_dir(&self, game: Game) -> PathBuf {
        self.storage().join(game.code())
    }

    /// Per-title log directory, `storage/<code>/main`.
    pub fn main_dir(&self, game: Game) -> PathBuf {
        self.storage_dir(game).join("main")
    }

    /// Make `path` relative to the root for archive layout. Paths that are
    /// not under the root come back unchanged; externally supplied files
    /// (e.g. from a transient profile root) are tolerated, not rejected.
    /// Separators are normalized to `/` for storage inside the archive.
    pub fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.to_string_lossy().replace('\\', "/")
    }
}
