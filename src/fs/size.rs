//! Recursive directory size measurement.

use std::path::Path;

use walkdir::WalkDir;

use crate::types::{InstallationRoot, SkippedPath};

/// Outcome of measuring a tree: total bytes plus the entries that could not
/// be read. Skips are tolerated, never fatal.
#[derive(Clone, Debug, Default)]
pub struct Measurement {
    pub bytes: u64,
    pub skipped: Vec<SkippedPath>,
}

impl Measurement {
    fn absorb(&mut self, other: Measurement) {
        self.bytes += other.bytes;
        self.skipped.extend(other.skipped);
    }
}

/// Sum the sizes of all regular files under `root`.
///
/// Symbolic links are never followed: a link counts as its own directory
/// entry, not as its target, which avoids infinite recursion on cyclic links
/// and double-counting. A missing root measures as zero bytes. Per-entry
/// errors (permissions, races) are recorded and skipped.
#[must_use]
pub fn measure(root: &Path) -> Measurement {
    let mut out = Measurement::default();
    if !root.exists() {
        return out;
    }
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let path = err
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                out.skipped.push(SkippedPath::new(path, err.to_string()));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(meta) => out.bytes += meta.len(),
            Err(err) => out
                .skipped
                .push(SkippedPath::new(entry.path(), err.to_string())),
        }
    }
    out
}

/// Measure only the backed-up subtrees of an installation.
#[must_use]
pub fn measure_install(install: &InstallationRoot) -> Measurement {
    let mut out = Measurement::default();
    out.absorb(measure(&install.userdata()));
    out.absorb(measure(&install.addons()));
    out
}

/// Render a byte count for status lines ("1.23 MB").
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < KIB * KIB {
        format!("{:.2} KB", b / KIB)
    } else if b < KIB * KIB * KIB {
        format!("{:.2} MB", b / (KIB * KIB))
    } else {
        format!("{:.2} GB", b / (KIB * KIB * KIB))
    }
}
