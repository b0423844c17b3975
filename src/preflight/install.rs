//! Non-mutating classification of installation roots and restore targets.

use std::fs;
use std::path::Path;

use crate::constants::{ADDONS_DIR, USERDATA_DIR};
use crate::fs::paths::{dir_is_empty, is_filesystem_root};
use crate::types::{Error, ErrorKind, InstallationRoot, RestoreTargetClass, Result};

/// Check that `path` is a usable installation root.
///
/// A directory with both `userdata` and `addons` is a full installation; one
/// with exactly one of the two is accepted as partial (backup and cleanup
/// still proceed on whatever exists).
///
/// # Errors
///
/// `NotFound` when the path does not exist, `NotADirectory` when it is a
/// file, `NotAnInstallation` when neither subtree exists.
pub fn validate_installation(path: &Path) -> Result<InstallationRoot> {
    let meta = fs::metadata(path).map_err(|_| {
        Error::new(
            ErrorKind::NotFound,
            format!("installation path not found: {}", path.display()),
        )
    })?;
    if !meta.is_dir() {
        return Err(Error::new(
            ErrorKind::NotADirectory,
            format!("installation path is not a directory: {}", path.display()),
        ));
    }
    let has_userdata = path.join(USERDATA_DIR).is_dir();
    let has_addons = path.join(ADDONS_DIR).is_dir();
    if !has_userdata && !has_addons {
        return Err(Error::new(
            ErrorKind::NotAnInstallation,
            format!(
                "neither '{USERDATA_DIR}' nor '{ADDONS_DIR}' found under {}",
                path.display()
            ),
        ));
    }
    Ok(InstallationRoot::new(
        path.to_path_buf(),
        has_userdata,
        has_addons,
    ))
}

/// Classify what a candidate restore target currently is.
///
/// The path is resolved to canonical form first; a canonical path with no
/// parent is a filesystem root. A partial installation (only one of the two
/// subtrees) deliberately classifies as `NonEmptyForeignDirectory` and is
/// later refused.
#[must_use]
pub fn classify_restore_target(path: &Path) -> RestoreTargetClass {
    if !path.exists() {
        return RestoreTargetClass::DoesNotExist;
    }
    if is_filesystem_root(path) {
        return RestoreTargetClass::FilesystemRoot;
    }
    if !path.is_dir() {
        return RestoreTargetClass::NonEmptyForeignDirectory;
    }
    if dir_is_empty(path).unwrap_or(false) {
        return RestoreTargetClass::EmptyDirectory;
    }
    if path.join(USERDATA_DIR).is_dir() && path.join(ADDONS_DIR).is_dir() {
        return RestoreTargetClass::ExistingInstallation;
    }
    RestoreTargetClass::NonEmptyForeignDirectory
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_path_is_not_found() {
        let td = tempfile::tempdir().expect("tempdir");
        let err = validate_installation(&td.path().join("absent")).expect_err("must fail");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn file_is_not_a_directory() {
        let td = tempfile::tempdir().expect("tempdir");
        let file = td.path().join("kodi");
        fs::write(&file, b"").expect("write");
        let err = validate_installation(&file).expect_err("must fail");
        assert_eq!(err.kind, ErrorKind::NotADirectory);
    }

    #[test]
    fn empty_dir_is_not_an_installation() {
        let td = tempfile::tempdir().expect("tempdir");
        let err = validate_installation(td.path()).expect_err("must fail");
        assert_eq!(err.kind, ErrorKind::NotAnInstallation);
    }

    #[test]
    fn full_installation_validates() {
        let td = tempfile::tempdir().expect("tempdir");
        fs::create_dir(td.path().join("userdata")).expect("mkdir");
        fs::create_dir(td.path().join("addons")).expect("mkdir");
        let root = validate_installation(td.path()).expect("valid");
        assert!(root.has_userdata && root.has_addons);
        assert!(!root.is_partial());
    }

    #[test]
    fn one_subtree_is_partial() {
        let td = tempfile::tempdir().expect("tempdir");
        fs::create_dir(td.path().join("userdata")).expect("mkdir");
        let root = validate_installation(td.path()).expect("valid");
        assert!(root.is_partial());
    }

    #[test]
    fn classification_covers_all_shapes() {
        let td = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            classify_restore_target(&td.path().join("absent")),
            RestoreTargetClass::DoesNotExist
        );
        assert_eq!(
            classify_restore_target(Path::new("/")),
            RestoreTargetClass::FilesystemRoot
        );

        let empty = td.path().join("empty");
        fs::create_dir(&empty).expect("mkdir");
        assert_eq!(
            classify_restore_target(&empty),
            RestoreTargetClass::EmptyDirectory
        );

        let install = td.path().join("install");
        fs::create_dir_all(install.join("userdata")).expect("mkdir");
        fs::create_dir_all(install.join("addons")).expect("mkdir");
        assert_eq!(
            classify_restore_target(&install),
            RestoreTargetClass::ExistingInstallation
        );

        let foreign = td.path().join("foreign");
        fs::create_dir(&foreign).expect("mkdir");
        fs::write(foreign.join("notes.txt"), b"hello").expect("write");
        assert_eq!(
            classify_restore_target(&foreign),
            RestoreTargetClass::NonEmptyForeignDirectory
        );
    }

    #[test]
    fn partial_installation_is_foreign_as_a_target() {
        let td = tempfile::tempdir().expect("tempdir");
        let partial = td.path().join("partial");
        fs::create_dir_all(partial.join("userdata")).expect("mkdir");
        assert_eq!(
            classify_restore_target(&partial),
            RestoreTargetClass::NonEmptyForeignDirectory
        );
    }
}
