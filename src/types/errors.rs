//! Error types used across kodibak.
use thiserror::Error;

/// High-level error categories for engine operations.
///
/// Validation kinds are always produced before any destructive action;
/// `Io`/`DiskFull` may occur mid-operation and abort it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("path not found")]
    NotFound,
    #[error("not a directory")]
    NotADirectory,
    #[error("not a Kodi installation")]
    NotAnInstallation,
    #[error("invalid archive label")]
    InvalidLabel,
    #[error("destination not writable")]
    DestinationNotWritable,
    #[error("disk full")]
    DiskFull,
    #[error("not a zip archive")]
    NotAZip,
    #[error("corrupt archive")]
    CorruptArchive,
    #[error("unsafe archive entry")]
    UnsafeEntry,
    #[error("archive does not contain a backup")]
    NotABackup,
    #[error("restore target refused")]
    RefusedTarget,
    #[error("extraction failed")]
    ExtractionFailed,
    #[error("an operation is already in progress")]
    OperationInProgress,
    #[error("io error")]
    Io,
}

/// Structured error with a kind and human message.
///
/// The message always names the path responsible where one exists.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {msg}")]
pub struct Error {
    pub kind: ErrorKind,
    pub msg: String,
}

impl Error {
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
        }
    }

    /// Wrap an io error, promoting out-of-space conditions to `DiskFull`.
    pub fn io(context: impl Into<String>, err: &std::io::Error) -> Self {
        let kind = if err.kind() == std::io::ErrorKind::StorageFull {
            ErrorKind::DiskFull
        } else {
            ErrorKind::Io
        };
        Self {
            kind,
            msg: format!("{}: {err}", context.into()),
        }
    }
}

/// Convenient alias for results returning a `types::Error`.
pub type Result<T> = std::result::Result<T, Error>;
