use std::fs;
use std::path::Path;

use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::errors::ReportError;
use crate::models::ContentDigest;

/// Compute CRC32, SHA-1 and SHA-256 over the content of `path`.
///
/// The file is read fully into memory once and all three algorithms run over
/// the identical byte buffer; inputs are bounded game-installation binaries,
/// so buffering the whole file is acceptable. The SHA digests are integrity
/// fingerprints, not a security boundary.
///
/// Returns `UnreadableFile` if the file cannot be opened or read; the caller
/// skips that file and records the failure instead of aborting the pass.
pub fn digest(path: &Path) -> Result<ContentDigest, ReportError> {
    let bytes = fs::read(path).map_err(|source| ReportError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut crc = crc32fast::Hasher::new();
    crc.update(&bytes);

    Ok(ContentDigest {
        crc32: format!("0x{:08X}", crc.finalize()),
        sha1: format!("{:x}", Sha1::digest(&bytes)),
        sha256: format!("{:x}", Sha256::digest(&bytes)),
    })
}
