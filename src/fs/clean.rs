//! Best-effort cache cleanup under an installation root.

use std::fs;
use std::path::Path;

use crate::adapters::{CancellationToken, ProgressReporter};
use crate::fs::paths::remove_any;
use crate::fs::size::measure;
use crate::policy::CleanupPolicy;
use crate::types::SkippedPath;

/// Outcome of one cleanup pass.
///
/// Running the same pass twice frees zero additional bytes the second time:
/// a configured path that no longer exists is a silent no-op.
#[derive(Clone, Debug, Default)]
pub struct CleanOutcome {
    pub bytes_freed: u64,
    /// Paths that existed but could not be removed, with their cause.
    pub skipped: Vec<SkippedPath>,
    /// Relative paths actually deleted, in processing order.
    pub removed: Vec<&'static str>,
    /// True when cancellation was observed between paths.
    pub cancelled: bool,
}

/// Remove every configured cache path under `root`: the mandatory set first,
/// then the policy's enabled optional caches.
///
/// A missing path is skipped silently; a path that exists but cannot be
/// removed is recorded in `skipped` and processing continues. Neither case is
/// fatal. The cancellation token is honored between paths, never mid-delete.
#[must_use]
pub fn clean(
    root: &Path,
    policy: &CleanupPolicy,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> CleanOutcome {
    let mut out = CleanOutcome::default();
    for rel in policy.targets() {
        if cancel.is_cancelled() {
            out.cancelled = true;
            return out;
        }
        let path = root.join(rel);
        let meta = match fs::symlink_metadata(&path) {
            Ok(m) => m,
            // Not present: nothing to free.
            Err(_) => continue,
        };
        let size = if meta.file_type().is_dir() {
            measure(&path).bytes
        } else {
            meta.len()
        };
        match remove_any(&path) {
            Ok(()) => {
                out.bytes_freed += size;
                out.removed.push(rel);
                reporter.status(&format!("Deleted {rel}"));
            }
            Err(err) => {
                reporter.status(&format!("Failed to delete {rel}: {err}"));
                out.skipped.push(SkippedPath::new(path, err.to_string()));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::NullReporter;
    use crate::policy::OptionalCache;

    fn write_tree(root: &Path, rel: &str, files: &[(&str, usize)]) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).expect("mkdir");
        for (name, size) in files {
            fs::write(dir.join(name), vec![0u8; *size]).expect("write");
        }
    }

    #[test]
    fn absent_paths_free_nothing_and_error_nothing() {
        let td = tempfile::tempdir().expect("tempdir");
        let out = clean(
            td.path(),
            &CleanupPolicy::aggressive_preset(),
            &NullReporter,
            &CancellationToken::new(),
        );
        assert_eq!(out.bytes_freed, 0);
        assert!(out.skipped.is_empty());
        assert!(out.removed.is_empty());
    }

    #[test]
    fn second_pass_frees_zero() {
        let td = tempfile::tempdir().expect("tempdir");
        write_tree(td.path(), "userdata/Thumbnails", &[("t1.jpg", 300), ("t2.jpg", 200)]);
        write_tree(td.path(), "addons/packages", &[("pkg.zip", 500)]);
        let policy = CleanupPolicy::default();
        let token = CancellationToken::new();

        let first = clean(td.path(), &policy, &NullReporter, &token);
        assert_eq!(first.bytes_freed, 1000);
        assert_eq!(first.removed.len(), 2);

        let second = clean(td.path(), &policy, &NullReporter, &token);
        assert_eq!(second.bytes_freed, 0);
        assert!(second.removed.is_empty());
        assert!(second.skipped.is_empty());
    }

    #[test]
    fn optional_cache_file_needs_its_flag() {
        let td = tempfile::tempdir().expect("tempdir");
        let rel = OptionalCache::UmbrellaCache.rel_path();
        let db = td.path().join(rel);
        fs::create_dir_all(db.parent().expect("parent")).expect("mkdir");
        fs::write(&db, vec![0u8; 128]).expect("write");

        let out = clean(
            td.path(),
            &CleanupPolicy::default(),
            &NullReporter,
            &CancellationToken::new(),
        );
        assert_eq!(out.bytes_freed, 0);
        assert!(db.exists(), "disabled optional cache must survive");

        let policy = CleanupPolicy::default().with_enabled(OptionalCache::UmbrellaCache, true);
        let out = clean(td.path(), &policy, &NullReporter, &CancellationToken::new());
        assert_eq!(out.bytes_freed, 128);
        assert!(!db.exists());
    }

    #[test]
    fn cancellation_stops_between_paths() {
        let td = tempfile::tempdir().expect("tempdir");
        write_tree(td.path(), "userdata/Thumbnails", &[("t.jpg", 64)]);
        let token = CancellationToken::new();
        token.cancel();
        let out = clean(td.path(), &CleanupPolicy::default(), &NullReporter, &token);
        assert!(out.cancelled);
        assert_eq!(out.bytes_freed, 0);
        assert!(td.path().join("userdata/Thumbnails").exists());
    }
}
