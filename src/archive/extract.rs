//! Archive extraction into a vetted restore target.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::adapters::{CancellationToken, ProgressReporter};
use crate::constants::{BACKUP_SUBTREES, PROGRESS_EVERY_FILES};
use crate::preflight::{classify_restore_target, validate_archive, validate_target};
use crate::types::{Error, ErrorKind, RestoreDecision, Result};

/// How an extraction attempt ended.
///
/// `Failed` and `Cancelled` both carry the entries written before the stop;
/// the engine never rolls those back, it reports them.
#[derive(Debug)]
pub enum ExtractOutcome {
    Complete {
        files: u64,
        bytes: u64,
    },
    Failed {
        completed: Vec<PathBuf>,
        bytes: u64,
        error: Error,
    },
    Cancelled {
        completed: Vec<PathBuf>,
        bytes: u64,
    },
}

/// Remove the target's existing `userdata` and `addons` subtrees, and only
/// those two. Anything else under the target is left untouched.
pub fn clear_previous_install(
    target: &Path,
    reporter: &dyn ProgressReporter,
) -> Result<()> {
    for sub in BACKUP_SUBTREES {
        let path = target.join(sub);
        if fs::symlink_metadata(&path).is_err() {
            continue;
        }
        crate::fs::paths::remove_any(&path)
            .map_err(|e| Error::io(path.display().to_string(), &e))?;
        reporter.status(&format!("Removed existing {sub} directory"));
    }
    Ok(())
}

/// Extract a validated archive into `target` under a non-refusing decision.
///
/// The target classification and the archive are re-validated here even when
/// the caller already ran both checks, so calling this directly can never
/// bypass them. `ProceedWithClear` removes the target's existing
/// `userdata`/`addons` before any entry is written.
///
/// # Errors
///
/// `RefusedTarget` when the fresh classification refuses the target (nothing
/// is written), plus every error `validate_archive` can produce. Per-entry
/// write failures are not errors of this function; they end the extraction
/// early and are reported through [`ExtractOutcome::Failed`].
pub fn restore(
    archive_path: &Path,
    target: &Path,
    decision: &RestoreDecision,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ExtractOutcome> {
    if let RestoreDecision::Refuse(reason) = decision {
        return Err(Error::new(ErrorKind::RefusedTarget, reason.clone()));
    }
    // Defensive re-validation: classification is never trusted across calls.
    let fresh = validate_target(classify_restore_target(target));
    if let RestoreDecision::Refuse(reason) = &fresh {
        return Err(Error::new(ErrorKind::RefusedTarget, reason.clone()));
    }
    let manifest = validate_archive(archive_path)?;

    if fresh == RestoreDecision::ProceedWithClear {
        clear_previous_install(target, reporter)?;
    }
    fs::create_dir_all(target).map_err(|e| Error::io(target.display().to_string(), &e))?;

    let file =
        File::open(archive_path).map_err(|e| Error::io(archive_path.display().to_string(), &e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        Error::new(
            ErrorKind::CorruptArchive,
            format!("{}: {e}", archive_path.display()),
        )
    })?;

    let total = manifest.entries.len() as u64;
    let mut completed: Vec<PathBuf> = Vec::new();
    let mut bytes: u64 = 0;
    reporter.progress("extract", 0, total);

    for entry in &manifest.entries {
        if cancel.is_cancelled() {
            return Ok(ExtractOutcome::Cancelled { completed, bytes });
        }
        let out_path = entry.rel.resolve_under(target);
        let written = write_entry(&mut archive, entry.index, &out_path);
        match written {
            Ok(n) => {
                bytes += n;
                completed.push(entry.rel.rel().to_path_buf());
            }
            Err(err) => {
                let error = Error::new(
                    ErrorKind::ExtractionFailed,
                    format!(
                        "{}: {err}; {} of {total} entries restored",
                        out_path.display(),
                        completed.len()
                    ),
                );
                return Ok(ExtractOutcome::Failed {
                    completed,
                    bytes,
                    error,
                });
            }
        }
        let done = completed.len() as u64;
        if done % PROGRESS_EVERY_FILES == 0 || done == total {
            reporter.progress("extract", done, total);
        }
    }

    Ok(ExtractOutcome::Complete {
        files: completed.len() as u64,
        bytes,
    })
}

fn write_entry(
    archive: &mut ZipArchive<File>,
    index: usize,
    out_path: &Path,
) -> io::Result<u64> {
    let mut entry = archive
        .by_index(index)
        .map_err(|e| io::Error::other(e.to_string()))?;
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(out_path)?;
    io::copy(&mut entry, &mut out)
}
