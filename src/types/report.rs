//! Terminal reports handed back to the caller.

use std::path::PathBuf;

use super::errors::Error;

/// Terminal status of one backup or restore operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationStatus {
    Success,
    Failed,
    Cancelled,
}

/// A tolerated per-path failure: the entry was skipped, the operation went on.
#[derive(Clone, Debug)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub cause: String,
}

impl SkippedPath {
    pub fn new(path: impl Into<PathBuf>, cause: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            cause: cause.into(),
        }
    }
}

/// Final report of one operation. Created at operation start, finalized at
/// operation end, then handed to the caller; the engine keeps no reference.
///
/// For a backup, `bytes_before`/`bytes_after` are the tree sizes around
/// cleanup and `archive` is the finalized archive path. For a restore,
/// `bytes_before` is 0 and `bytes_after` is the uncompressed bytes written.
#[derive(Clone, Debug)]
pub struct OperationResult {
    pub status: OperationStatus,
    pub bytes_before: u64,
    pub bytes_after: u64,
    pub duration_ms: u64,
    pub skipped: Vec<SkippedPath>,
    pub archive: Option<PathBuf>,
    pub error: Option<Error>,
}

impl OperationResult {
    pub(crate) fn new(status: OperationStatus) -> Self {
        Self {
            status,
            bytes_before: 0,
            bytes_after: 0,
            duration_ms: 0,
            skipped: Vec::new(),
            archive: None,
            error: None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == OperationStatus::Success
    }

    /// Bytes the cleanup stage reclaimed (backup only).
    #[must_use]
    pub fn bytes_freed(&self) -> u64 {
        self.bytes_before.saturating_sub(self.bytes_after)
    }
}
