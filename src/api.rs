// Facade for the operation controller; workflow sequencing lives under src/api/

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::adapters::{CancellationToken, NullReporter, ProgressReporter};
use crate::constants::DEFAULT_COMPRESSION_LEVEL;
use crate::logging::{AuditSink, FactsEmitter};
use crate::policy::CleanupPolicy;
use crate::types::{Error, ErrorKind, OperationResult, OperationStatus};

#[path = "api/backup.rs"]
mod backup_impl;
#[path = "api/restore.rs"]
mod restore_impl;

/// Everything one backup run needs, supplied by the caller per invocation.
/// The engine persists none of it.
#[derive(Clone, Debug)]
pub struct BackupRequest {
    pub installation: PathBuf,
    pub destination: PathBuf,
    pub label: Option<String>,
    pub cleanup: CleanupPolicy,
    pub compression_level: u8,
}

impl BackupRequest {
    #[must_use]
    pub fn new(installation: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            installation: installation.into(),
            destination: destination.into(),
            label: None,
            cleanup: CleanupPolicy::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_cleanup(mut self, cleanup: CleanupPolicy) -> Self {
        self.cleanup = cleanup;
        self
    }

    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }
}

/// Everything one restore run needs.
#[derive(Clone, Debug)]
pub struct RestoreRequest {
    pub archive: PathBuf,
    pub target: PathBuf,
}

impl RestoreRequest {
    #[must_use]
    pub fn new(archive: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            target: target.into(),
        }
    }
}

/// The operation controller: the only entry point a GUI collaborator calls.
///
/// Sequences validation, measurement, cleanup and archiving into the backup
/// workflow, and archive/target validation plus extraction into the restore
/// workflow. Owns mutual exclusion (one operation at a time) and cooperative
/// cancellation. Every public operation returns a terminal
/// [`OperationResult`]; no error escapes unhandled.
pub struct Vault<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    reporter: Box<dyn ProgressReporter>,
    cancel: CancellationToken,
    busy: Arc<AtomicBool>,
}

impl<E: FactsEmitter, A: AuditSink> Vault<E, A> {
    pub fn new(facts: E, audit: A) -> Self {
        Self {
            facts,
            audit,
            reporter: Box::new(NullReporter),
            cancel: CancellationToken::new(),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn with_progress_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Token the caller may use to cancel the in-flight operation.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run a full backup: validate, measure, clean, measure, archive.
    ///
    /// Fails fast with `OperationInProgress` while another operation runs.
    pub fn backup(&self, req: &BackupRequest) -> OperationResult {
        let Some(_guard) = self.try_acquire() else {
            return Self::busy_result();
        };
        backup_impl::run(self, req)
    }

    /// Run a full restore: validate archive, validate target, clear, extract.
    ///
    /// Fails fast with `OperationInProgress` while another operation runs.
    pub fn restore(&self, req: &RestoreRequest) -> OperationResult {
        let Some(_guard) = self.try_acquire() else {
            return Self::busy_result();
        };
        restore_impl::run(self, req)
    }

    fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(Arc::clone(&self.busy)))
    }

    fn busy_result() -> OperationResult {
        let mut result = OperationResult::new(OperationStatus::Failed);
        result.error = Some(Error::new(
            ErrorKind::OperationInProgress,
            "another backup or restore is already running",
        ));
        result
    }

    pub(crate) fn say(&self, msg: &str) {
        self.audit.log(log::Level::Info, msg);
        self.reporter.status(msg);
    }
}

impl<E, A> Vault<E, A>
where
    E: FactsEmitter + Send + Sync + 'static,
    A: AuditSink + Send + Sync + 'static,
{
    /// Run a backup on a worker thread so the caller's thread stays
    /// responsive; join the handle for the terminal result.
    pub fn spawn_backup(
        self: &Arc<Self>,
        req: BackupRequest,
    ) -> thread::JoinHandle<OperationResult> {
        let vault = Arc::clone(self);
        thread::spawn(move || vault.backup(&req))
    }

    /// Run a restore on a worker thread; join the handle for the result.
    pub fn spawn_restore(
        self: &Arc<Self>,
        req: RestoreRequest,
    ) -> thread::JoinHandle<OperationResult> {
        let vault = Arc::clone(self);
        thread::spawn(move || vault.restore(&req))
    }
}

/// Clears the in-flight flag when an operation ends, however it ends.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NullSink;

    #[test]
    fn second_acquire_fails_until_guard_drops() {
        let vault = Vault::new(NullSink, NullSink);
        let guard = vault.try_acquire().expect("first acquire");
        assert!(vault.try_acquire().is_none(), "must be exclusive");
        drop(guard);
        assert!(vault.try_acquire().is_some(), "freed after drop");
    }

    #[test]
    fn busy_backup_fails_fast() {
        let vault = Vault::new(NullSink, NullSink);
        let _guard = vault.try_acquire().expect("acquire");
        let result = vault.backup(&BackupRequest::new("/nowhere", "/nowhere-else"));
        assert_eq!(result.status, OperationStatus::Failed);
        assert_eq!(
            result.error.map(|e| e.kind),
            Some(ErrorKind::OperationInProgress)
        );
    }
}
