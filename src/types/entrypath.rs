use std::path::{Component, Path, PathBuf};

use super::errors::{Error, ErrorKind, Result};

/// Data-only type for a vetted archive entry path.
///
/// An `EntryPath` is guaranteed to be a normalized relative path with only
/// normal components, so resolving it under any target root can never escape
/// that root (zip-slip defense).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPath {
    rel: PathBuf,
}

impl EntryPath {
    /// Vets a raw archive entry name.
    ///
    /// Rejects absolute paths, drive/UNC prefixes, parent-directory segments
    /// and backslash separators; `.` segments are dropped. An entry that
    /// normalizes to nothing is rejected as well.
    ///
    /// # Errors
    ///
    /// Returns an `UnsafeEntry` error naming the offending entry.
    pub fn parse(name: &str) -> Result<Self> {
        if name.contains('\\') {
            return Err(Error::new(
                ErrorKind::UnsafeEntry,
                format!("entry '{name}' uses backslash separators"),
            ));
        }
        let candidate = Path::new(name);
        let mut rel = PathBuf::new();
        for seg in candidate.components() {
            match seg {
                Component::CurDir => {}
                Component::Normal(p) => rel.push(p),
                Component::ParentDir => {
                    return Err(Error::new(
                        ErrorKind::UnsafeEntry,
                        format!("entry '{name}' contains a parent-directory segment"),
                    ));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::new(
                        ErrorKind::UnsafeEntry,
                        format!("entry '{name}' is an absolute path"),
                    ));
                }
            }
        }
        if rel.as_os_str().is_empty() {
            return Err(Error::new(
                ErrorKind::UnsafeEntry,
                format!("entry '{name}' normalizes to an empty path"),
            ));
        }
        Ok(Self { rel })
    }

    /// Returns the normalized relative path.
    pub fn rel(&self) -> &Path {
        &self.rel
    }

    /// Returns the extraction path of this entry under `root`.
    #[must_use]
    pub fn resolve_under(&self, root: &Path) -> PathBuf {
        root.join(&self.rel)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn rejects_dotdot() {
        assert!(EntryPath::parse("../etc/passwd").is_err());
        assert!(EntryPath::parse("userdata/../../escape").is_err());
    }

    #[test]
    fn rejects_absolute() {
        assert!(EntryPath::parse("/etc/passwd").is_err());
    }

    #[test]
    fn rejects_backslashes() {
        assert!(EntryPath::parse("userdata\\..\\escape").is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(EntryPath::parse("").is_err());
        assert!(EntryPath::parse("./.").is_err());
    }

    #[test]
    fn normalizes_curdir_components() {
        let ep = EntryPath::parse("./userdata/./guisettings.xml")
            .unwrap_or_else(|e| panic!("curdir components should normalize: {e}"));
        assert_eq!(ep.rel(), Path::new("userdata/guisettings.xml"));
    }

    #[test]
    fn resolves_under_root() {
        let ep = EntryPath::parse("addons/packages/seen.zip")
            .unwrap_or_else(|e| panic!("plain entry should parse: {e}"));
        assert_eq!(
            ep.resolve_under(Path::new("/tmp/target")),
            Path::new("/tmp/target/addons/packages/seen.zip")
        );
        assert!(ep.resolve_under(Path::new("/tmp/target")).starts_with("/tmp/target"));
    }
}
