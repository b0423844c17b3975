//! Archive filename generation and parsing.
//!
//! Pattern: `kodi.bkup_<YYYY-MM-DD>.zip`, or
//! `kodi.bkup_<YYYY-MM-DD>_<label>.zip` with a caller-supplied label.

use chrono::{Local, NaiveDate};

use crate::constants::{ARCHIVE_DATE_FMT, ARCHIVE_EXT, ARCHIVE_PREFIX};
use crate::types::{Error, ErrorKind, Result};

/// The two pieces a backup filename encodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveName {
    pub date: NaiveDate,
    pub label: Option<String>,
}

impl ArchiveName {
    /// Build a name for the given date. An empty label collapses to none.
    ///
    /// # Errors
    ///
    /// `InvalidLabel` when the label holds characters unsafe for filenames
    /// (anything outside `[A-Za-z0-9._+-]`).
    pub fn new(date: NaiveDate, label: Option<&str>) -> Result<Self> {
        let label = match label.map(str::trim) {
            None | Some("") => None,
            Some(l) => {
                if !label_ok(l) {
                    return Err(Error::new(
                        ErrorKind::InvalidLabel,
                        format!("label '{l}' holds characters unsafe for a filename"),
                    ));
                }
                Some(l.to_string())
            }
        };
        Ok(Self { date, label })
    }

    /// Build a name stamped with today's local date.
    pub fn today(label: Option<&str>) -> Result<Self> {
        Self::new(Local::now().date_naive(), label)
    }

    /// Render the filename this name describes.
    #[must_use]
    pub fn file_name(&self) -> String {
        let date = self.date.format(ARCHIVE_DATE_FMT);
        match &self.label {
            Some(label) => format!("{ARCHIVE_PREFIX}{date}_{label}.{ARCHIVE_EXT}"),
            None => format!("{ARCHIVE_PREFIX}{date}.{ARCHIVE_EXT}"),
        }
    }

    /// Parse a filename back into date and optional label. Returns `None`
    /// for anything that does not match the documented pattern.
    #[must_use]
    pub fn parse(file_name: &str) -> Option<Self> {
        let rest = file_name.strip_prefix(ARCHIVE_PREFIX)?;
        let rest = rest.strip_suffix(&format!(".{ARCHIVE_EXT}"))?;
        // The date is a fixed-width 10-byte stamp; a foreign name may put a
        // multibyte character across that boundary, which is just a non-match.
        let date_s = rest.get(..10)?;
        let tail = rest.get(10..)?;
        let date = NaiveDate::parse_from_str(date_s, ARCHIVE_DATE_FMT).ok()?;
        let label = match tail {
            "" => None,
            t => {
                let l = t.strip_prefix('_')?;
                if l.is_empty() || !label_ok(l) {
                    return None;
                }
                Some(l.to_string())
            }
        };
        Some(Self { date, label })
    }
}

fn label_ok(label: &str) -> bool {
    label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'))
}
