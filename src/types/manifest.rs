//! Archive-side data types: inspection manifests and creation descriptors.

use std::path::PathBuf;

use crate::constants::{ADDONS_DIR, USERDATA_DIR};

use super::entrypath::EntryPath;

/// One vetted file entry inside an archive under inspection.
#[derive(Clone, Debug)]
pub struct ManifestEntry {
    /// Index of the entry inside the zip container.
    pub index: usize,
    /// Vetted extraction path, relative to the target root.
    pub rel: EntryPath,
    /// Uncompressed size in bytes.
    pub size: u64,
}

/// Result of inspecting an archive without extracting anything.
///
/// Every entry listed here has already passed path-safety vetting; an archive
/// with a single unsafe entry never produces a manifest.
#[derive(Clone, Debug, Default)]
pub struct ArchiveManifest {
    pub entries: Vec<ManifestEntry>,
    pub total_bytes: u64,
    pub userdata_files: usize,
    pub addons_files: usize,
}

impl ArchiveManifest {
    pub(crate) fn push(&mut self, entry: ManifestEntry) {
        self.total_bytes += entry.size;
        if entry.rel.rel().starts_with(USERDATA_DIR) {
            self.userdata_files += 1;
        } else if entry.rel.rel().starts_with(ADDONS_DIR) {
            self.addons_files += 1;
        }
        self.entries.push(entry);
    }
}

/// One file written into a freshly created archive.
#[derive(Clone, Debug)]
pub struct ArchiveEntry {
    /// Path relative to the installation root.
    pub rel: PathBuf,
    /// Uncompressed size in bytes.
    pub size: u64,
}

/// Description of a finalized backup archive. Immutable once the archive has
/// been renamed to its final name on disk.
#[derive(Clone, Debug)]
pub struct ArchiveDescriptor {
    /// Final on-disk path of the archive.
    pub path: PathBuf,
    /// Deflate level the entries were written with.
    pub compression_level: u8,
    /// Entries in the order they were written.
    pub entries: Vec<ArchiveEntry>,
    /// Sum of uncompressed entry sizes.
    pub total_bytes: u64,
    /// Size of the archive file itself.
    pub archive_bytes: u64,
}
