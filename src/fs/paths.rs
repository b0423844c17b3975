//! Small filesystem helpers shared by measurement, cleanup and archiving.

use std::fs;
use std::path::Path;

/// Flush a rename to disk by syncing the parent directory.
pub fn fsync_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        let dir = fs::File::open(parent)?;
        dir.sync_all()?;
    }
    Ok(())
}

/// True when `path` is a directory with no entries.
pub fn dir_is_empty(path: &Path) -> std::io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Remove a filesystem node of any kind: files and symlinks are unlinked,
/// directories are removed recursively. Symlinks are never followed.
pub fn remove_any(path: &Path) -> std::io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.file_type().is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// True when the canonical form of `path` is the top of a filesystem
/// (`/`, a drive root). Such a path is never a valid restore target.
#[must_use]
pub fn is_filesystem_root(path: &Path) -> bool {
    match fs::canonicalize(path) {
        Ok(canon) => canon.parent().is_none(),
        Err(_) => false,
    }
}
