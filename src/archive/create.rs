//! Backup archive creation.
//!
//! The archive is written under a dot-prefixed temporary name opened
//! exclusively, then renamed to its final name only after every entry is
//! written and the container is closed. An observer never sees a partially
//! written archive under its final name; a crash mid-write leaves only an
//! orphaned temp file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::adapters::{CancellationToken, ProgressReporter};
use crate::archive::name::ArchiveName;
use crate::constants::{BACKUP_SUBTREES, MAX_COMPRESSION_LEVEL, PROGRESS_EVERY_FILES};
use crate::fs::paths::fsync_parent_dir;
use crate::types::{
    ArchiveDescriptor, ArchiveEntry, Error, ErrorKind, InstallationRoot, Result,
};

/// How a creation attempt ended short of an error.
#[derive(Debug)]
pub enum CreateOutcome {
    Complete(ArchiveDescriptor),
    /// Cancellation observed between files; the temp file was discarded.
    Cancelled,
}

/// Walk the installation's backed-up subtrees and write them into a zip
/// archive named `name` under `destination`.
///
/// # Errors
///
/// `DestinationNotWritable` when the destination directory or the exclusive
/// temp file cannot be created, `DiskFull`/`Io` when writing fails mid-way
/// (the temp file is deleted on those paths, nothing appears at the final
/// name).
pub fn create(
    install: &InstallationRoot,
    destination: &Path,
    name: &ArchiveName,
    compression_level: u8,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> Result<CreateOutcome> {
    fs::create_dir_all(destination).map_err(|e| {
        Error::new(
            ErrorKind::DestinationNotWritable,
            format!("cannot create destination {}: {e}", destination.display()),
        )
    })?;

    let files = collect_files(install)?;
    let total = files.len() as u64;
    let file_name = name.file_name();
    let final_path = destination.join(&file_name);
    let tmp_path = destination.join(format!(".{file_name}.tmp"));

    // Exclusive create: a second operation racing for the same archive path
    // fails here instead of corrupting the first one's output.
    let tmp_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|e| {
            Error::new(
                ErrorKind::DestinationNotWritable,
                format!("cannot create {}: {e}", tmp_path.display()),
            )
        })?;
    let mut guard = TempGuard::new(&tmp_path);

    let level = compression_level.min(MAX_COMPRESSION_LEVEL);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i32::from(level)));

    let mut writer = ZipWriter::new(tmp_file);
    let mut entries: Vec<ArchiveEntry> = Vec::with_capacity(files.len());
    let mut total_bytes: u64 = 0;
    reporter.progress("archive", 0, total);

    for (written, (abs, rel, size)) in files.into_iter().enumerate() {
        if cancel.is_cancelled() {
            drop(writer);
            return Ok(CreateOutcome::Cancelled);
        }
        writer
            .start_file(zip_entry_name(&rel), options)
            .map_err(|e| map_zip_error(&rel, &e))?;
        let mut src = File::open(&abs).map_err(|e| Error::io(abs.display().to_string(), &e))?;
        io::copy(&mut src, &mut writer).map_err(|e| Error::io(abs.display().to_string(), &e))?;
        total_bytes += size;
        entries.push(ArchiveEntry { rel, size });

        let done = written as u64 + 1;
        if done % PROGRESS_EVERY_FILES == 0 || done == total {
            reporter.progress("archive", done, total);
        }
    }

    let tmp_file = writer.finish().map_err(|e| map_zip_error(&final_path, &e))?;
    tmp_file
        .sync_all()
        .map_err(|e| Error::io(tmp_path.display().to_string(), &e))?;
    drop(tmp_file);

    fs::rename(&tmp_path, &final_path)
        .map_err(|e| Error::io(final_path.display().to_string(), &e))?;
    guard.disarm();
    // Rename durability; failure here does not invalidate the archive.
    let _ = fsync_parent_dir(&final_path);

    let archive_bytes = fs::metadata(&final_path).map(|m| m.len()).unwrap_or(0);
    Ok(CreateOutcome::Complete(ArchiveDescriptor {
        path: final_path,
        compression_level: level,
        entries,
        total_bytes,
        archive_bytes,
    }))
}

/// Files to archive, as (absolute path, root-relative path, size), walking
/// only the backed-up subtrees in a deterministic order.
fn collect_files(install: &InstallationRoot) -> Result<Vec<(PathBuf, PathBuf, u64)>> {
    let mut files = Vec::new();
    for sub in BACKUP_SUBTREES {
        let dir = install.path().join(sub);
        if !dir.is_dir() {
            continue;
        }
        for entry in walkdir::WalkDir::new(&dir)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                Error::new(
                    ErrorKind::Io,
                    format!("cannot walk {}: {e}", dir.display()),
                )
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(install.path())
                .map_err(|e| {
                    Error::new(
                        ErrorKind::Io,
                        format!("path outside root {}: {e}", entry.path().display()),
                    )
                })?
                .to_path_buf();
            let size = entry
                .metadata()
                .map_err(|e| Error::new(ErrorKind::Io, format!("{}: {e}", entry.path().display())))?
                .len();
            files.push((entry.into_path(), rel, size));
        }
    }
    Ok(files)
}

/// Archive entry name for a root-relative path, always slash-separated.
fn zip_entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn map_zip_error(path: &Path, err: &ZipError) -> Error {
    match err {
        ZipError::Io(io) => Error::io(path.display().to_string(), io),
        _ => Error::new(ErrorKind::Io, format!("{}: {err}", path.display())),
    }
}

/// Deletes the temp archive on drop unless disarmed after the final rename.
struct TempGuard<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> TempGuard<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(self.path);
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::adapters::NullReporter;
    use crate::constants::DEFAULT_COMPRESSION_LEVEL;
    use crate::preflight::validate_installation;
    use chrono::NaiveDate;

    fn fixture_install(root: &Path) -> InstallationRoot {
        fs::create_dir_all(root.join("userdata/addon_data")).expect("mkdir");
        fs::create_dir_all(root.join("addons/plugin.video.x")).expect("mkdir");
        fs::write(root.join("userdata/guisettings.xml"), b"<settings/>").expect("write");
        fs::write(root.join("userdata/addon_data/s.xml"), b"<s/>").expect("write");
        fs::write(root.join("addons/plugin.video.x/addon.xml"), b"<addon/>").expect("write");
        // Content outside the two subtrees must never be archived.
        fs::write(root.join("kodi.log"), b"not backed up").expect("write");
        validate_installation(root).expect("valid install")
    }

    fn test_name() -> ArchiveName {
        let date = NaiveDate::from_ymd_opt(2026, 8, 28).expect("date");
        ArchiveName::new(date, Some("test")).expect("name")
    }

    #[test]
    fn writes_only_backup_subtrees_and_renames_atomically() {
        let td = tempfile::tempdir().expect("tempdir");
        let install = fixture_install(td.path());
        let dest = td.path().join("backups");

        let outcome = create(
            &install,
            &dest,
            &test_name(),
            DEFAULT_COMPRESSION_LEVEL,
            &NullReporter,
            &CancellationToken::new(),
        )
        .expect("create");
        let desc = match outcome {
            CreateOutcome::Complete(d) => d,
            CreateOutcome::Cancelled => panic!("not cancelled"),
        };

        assert_eq!(desc.path, dest.join("kodi.bkup_2026-08-28_test.zip"));
        assert!(desc.path.exists());
        assert_eq!(desc.entries.len(), 3);
        assert!(desc
            .entries
            .iter()
            .all(|e| e.rel.starts_with("userdata") || e.rel.starts_with("addons")));
        assert!(desc.archive_bytes > 0);

        // No temp artifact left behind.
        let leftovers: Vec<_> = fs::read_dir(&dest)
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn cancellation_discards_the_temp_file() {
        let td = tempfile::tempdir().expect("tempdir");
        let install = fixture_install(td.path());
        let dest = td.path().join("backups");
        let token = CancellationToken::new();
        token.cancel();

        let outcome = create(
            &install,
            &dest,
            &test_name(),
            DEFAULT_COMPRESSION_LEVEL,
            &NullReporter,
            &token,
        )
        .expect("create");
        assert!(matches!(outcome, CreateOutcome::Cancelled));
        assert!(fs::read_dir(&dest)
            .expect("read_dir")
            .next()
            .is_none(), "nothing may remain in the destination");
    }

    #[test]
    fn unwritable_destination_is_reported() {
        let td = tempfile::tempdir().expect("tempdir");
        let install = fixture_install(td.path());
        let blocked = td.path().join("blocked");
        fs::write(&blocked, b"a file, not a directory").expect("write");

        let err = create(
            &install,
            &blocked,
            &test_name(),
            DEFAULT_COMPRESSION_LEVEL,
            &NullReporter,
            &CancellationToken::new(),
        )
        .expect_err("must fail");
        assert_eq!(err.kind, ErrorKind::DestinationNotWritable);
    }
}
