use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the evidence pipeline.
///
/// Fatal variants (`RootNotFound`, `InvalidRoot`, `DestinationExists`,
/// `MissingSourceFile` and the archive/serialization failures) abort the run
/// before anything is written to the destination. `UnreadableFile` and
/// `UnknownTitle` are recoverable: callers skip the affected entry and record
/// a line in the bundle's error list.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("install root {0:?} does not exist")]
    RootNotFound(PathBuf),

    #[error("{path:?} is not a Plutonium installation: missing '{missing}' directory")]
    InvalidRoot { path: PathBuf, missing: &'static str },

    #[error("could not read {path:?}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown title code '{0}'")]
    UnknownTitle(String),

    #[error("report archive {0:?} already exists, refusing to overwrite it")]
    DestinationExists(PathBuf),

    #[error("{path:?} vanished before it could be archived: {source}")]
    MissingSourceFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("manifest serialization failed: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
