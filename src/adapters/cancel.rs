use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between the caller and a running
/// operation.
///
/// The engine checks the flag between discrete units of work (between files
/// during cleanup, archiving and extraction), never inside a single file's
/// read or write. Cancellation leaves whatever was already written on disk.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the operation holding this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Re-arm the token before starting another operation. The engine never
    /// clears a requested cancellation on its own.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
