//! Installation root and restore target classification types.

use std::path::{Path, PathBuf};

use crate::constants::{ADDONS_DIR, USERDATA_DIR};

/// A validated installation root: an absolute directory holding at least one
/// of the `userdata`/`addons` subtrees.
///
/// Held read-only by the controller for the duration of one operation; the
/// engine mutates the tree only through cleanup and restore clearing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallationRoot {
    path: PathBuf,
    pub has_userdata: bool,
    pub has_addons: bool,
}

impl InstallationRoot {
    pub(crate) fn new(path: PathBuf, has_userdata: bool, has_addons: bool) -> Self {
        Self {
            path,
            has_userdata,
            has_addons,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when only one of the two subtrees exists. Backup and cleanup can
    /// still proceed on whatever is present.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.has_userdata != self.has_addons
    }

    pub fn userdata(&self) -> PathBuf {
        self.path.join(USERDATA_DIR)
    }

    pub fn addons(&self) -> PathBuf {
        self.path.join(ADDONS_DIR)
    }
}

/// What a candidate restore target currently is. Computed fresh for every
/// restore attempt, never cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreTargetClass {
    /// Exists and holds nothing.
    EmptyDirectory,
    /// Exists with both `userdata` and `addons` subtrees.
    ExistingInstallation,
    /// Exists, is non-empty, and is not a recognized installation.
    NonEmptyForeignDirectory,
    /// The top of a filesystem; never a valid target.
    FilesystemRoot,
    /// Absent; the engine may create it.
    DoesNotExist,
}

/// Verdict on whether a restore may proceed against a classified target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestoreDecision {
    /// Extract directly, nothing to clear.
    Proceed,
    /// Remove the target's existing `userdata`/`addons` first, then extract.
    ProceedWithClear,
    /// Do not touch the target at all.
    Refuse(String),
}

impl RestoreDecision {
    #[must_use]
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::Refuse(_))
    }
}
