//! Archive inspection and the restore go/no-go decision.
//!
//! Validation is two-phase by design: every entry of the archive is vetted
//! here before the extractor writes a single byte, so one malicious entry
//! poisons nothing.

use std::fs::File;
use std::path::Path;

use zip::result::ZipError;
use zip::ZipArchive;

use crate::constants::ARCHIVE_EXT;
use crate::types::{
    ArchiveManifest, EntryPath, Error, ErrorKind, ManifestEntry, RestoreDecision,
    RestoreTargetClass, Result,
};

/// Open an archive purely for inspection and build its manifest.
///
/// # Errors
///
/// `NotFound` when the file is absent, `NotAZip` when the container format is
/// unrecognized, `CorruptArchive` when the central directory cannot be read,
/// `UnsafeEntry` when any entry would escape an extraction root, and
/// `NotABackup` when the archive holds neither a `userdata` nor an `addons`
/// tree.
pub fn validate_archive(path: &Path) -> Result<ArchiveManifest> {
    if !path.exists() {
        return Err(Error::new(
            ErrorKind::NotFound,
            format!("archive not found: {}", path.display()),
        ));
    }
    let is_zip_name = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ARCHIVE_EXT));
    if !is_zip_name {
        return Err(Error::new(
            ErrorKind::NotAZip,
            format!("not a zip archive: {}", path.display()),
        ));
    }
    let file = File::open(path).map_err(|e| Error::io(path.display().to_string(), &e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| map_zip_error(path, &e))?;

    let mut manifest = ArchiveManifest::default();
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| map_zip_error(path, &e))?;
        // Vet the name of every entry, directory markers included.
        let rel = EntryPath::parse(entry.name())?;
        if entry.is_dir() {
            continue;
        }
        manifest.push(ManifestEntry {
            index,
            rel,
            size: entry.size(),
        });
    }
    if manifest.userdata_files == 0 && manifest.addons_files == 0 {
        return Err(Error::new(
            ErrorKind::NotABackup,
            format!(
                "archive contains neither a userdata nor an addons tree: {}",
                path.display()
            ),
        ));
    }
    Ok(manifest)
}

fn map_zip_error(path: &Path, err: &ZipError) -> Error {
    match err {
        ZipError::Io(io) => Error::io(path.display().to_string(), io),
        _ => Error::new(
            ErrorKind::CorruptArchive,
            format!("{}: {err}", path.display()),
        ),
    }
}

/// Decide whether extraction may proceed against a classified target.
#[must_use]
pub fn validate_target(class: RestoreTargetClass) -> RestoreDecision {
    match class {
        RestoreTargetClass::FilesystemRoot => {
            RestoreDecision::Refuse("cannot target a filesystem root".to_string())
        }
        RestoreTargetClass::NonEmptyForeignDirectory => RestoreDecision::Refuse(
            "target is non-empty and not a recognized installation".to_string(),
        ),
        RestoreTargetClass::EmptyDirectory | RestoreTargetClass::DoesNotExist => {
            RestoreDecision::Proceed
        }
        RestoreTargetClass::ExistingInstallation => RestoreDecision::ProceedWithClear,
    }
}
