// src/rewrite/writer.rs
//! Disk side of a rewrite: snapshot, backup, atomic replace.

use crate::error::{DocError, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const BACKUP_SUFFIX: &str = ".bak";
const TEMP_SUFFIX: &str = ".docwright.tmp";

/// Hash of a file's bytes at the moment it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub sha256: String,
    pub len: u64,
}

impl Snapshot {
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self {
            sha256: compute_sha256(bytes),
            len: bytes.len() as u64,
        }
    }
}

#[must_use]
pub fn compute_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Copies `path` to `path.bak`, overwriting an older backup.
///
/// # Errors
/// Returns `Io` if the copy fails.
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    let backup = with_suffix(path, BACKUP_SUFFIX);
    fs::copy(path, &backup).map_err(|e| DocError::io(e, &backup))?;
    tracing::debug!(backup = %backup.display(), "backup written");
    Ok(backup)
}

/// Replaces `path` with `contents` via a sibling temp file and a rename.
///
/// The on-disk file must still match `snapshot`; otherwise someone else
/// changed it since it was read and nothing is written.
///
/// # Errors
/// Returns `RewriteFailure` on a snapshot mismatch or any I/O failure.
pub fn write_atomic(path: &Path, contents: &str, snapshot: &Snapshot) -> Result<()> {
    let current = fs::read(path)
        .map_err(|e| DocError::rewrite(path, format!("cannot re-read file: {e}")))?;
    if Snapshot::of(&current) != *snapshot {
        return Err(DocError::rewrite(path, "file changed on disk since it was read"));
    }

    let permissions = fs::metadata(path)
        .map_err(|e| DocError::rewrite(path, format!("cannot read metadata: {e}")))?
        .permissions();

    let temp_path = with_suffix(path, TEMP_SUFFIX);
    let result = fs::write(&temp_path, contents)
        .and_then(|()| fs::set_permissions(&temp_path, permissions))
        .and_then(|()| fs::rename(&temp_path, path));

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(DocError::rewrite(path, format!("write failed: {e}")));
    }
    Ok(())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
