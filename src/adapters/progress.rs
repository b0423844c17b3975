//! Progress reporting across the worker/caller thread boundary.
//!
//! The engine pushes one-way notifications and never waits on the caller's
//! handling of them; a slow or absent receiver cannot stall an operation.

use std::sync::mpsc::{Receiver, Sender};

/// Observer interface for in-flight operation updates.
pub trait ProgressReporter: Send + Sync {
    /// A human-readable status line.
    fn status(&self, msg: &str);
    /// File-count progress for a stage (`archive`, `extract`).
    fn progress(&self, stage: &str, current: u64, total: u64);
}

/// Reporter that discards all updates.
#[derive(Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn status(&self, _msg: &str) {}
    fn progress(&self, _stage: &str, _current: u64, _total: u64) {}
}

/// One update as shipped over a [`ChannelReporter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    Status(String),
    Progress {
        stage: String,
        current: u64,
        total: u64,
    },
}

/// Reporter backed by an mpsc channel, for GUI threads that poll events.
///
/// A disconnected receiver is tolerated silently; updates are then dropped.
pub struct ChannelReporter {
    tx: Sender<ProgressEvent>,
}

impl ChannelReporter {
    #[must_use]
    pub fn new() -> (Self, Receiver<ProgressEvent>) {
        let (tx, rx) = std::sync::mpsc::channel();
        (Self { tx }, rx)
    }
}

impl ProgressReporter for ChannelReporter {
    fn status(&self, msg: &str) {
        let _ = self.tx.send(ProgressEvent::Status(msg.to_string()));
    }

    fn progress(&self, stage: &str, current: u64, total: u64) {
        let _ = self.tx.send(ProgressEvent::Progress {
            stage: stage.to_string(),
            current,
            total,
        });
    }
}
