//! Crate-wide constants: archive naming, cleanup path sets, defaults.

/// Top-level subtree holding user settings and databases.
pub const USERDATA_DIR: &str = "userdata";
/// Top-level subtree holding installed addons.
pub const ADDONS_DIR: &str = "addons";

/// Prefix of every backup archive filename.
pub const ARCHIVE_PREFIX: &str = "kodi.bkup_";
/// Extension of every backup archive filename.
pub const ARCHIVE_EXT: &str = "zip";
/// Date format embedded in archive filenames.
pub const ARCHIVE_DATE_FMT: &str = "%Y-%m-%d";

/// Deflate level used when the caller does not ask for one (speed/size middle ground).
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;
/// Highest deflate level the container accepts.
pub const MAX_COMPRESSION_LEVEL: u8 = 9;

/// Cache paths removed before every backup, relative to the installation root.
/// Not caller-toggleable.
pub const MANDATORY_CLEANUP: &[&str] = &[
    "userdata/Thumbnails",
    "userdata/addon_data/plugin.video.themoviedb.helper/blur_v2",
    "userdata/addon_data/plugin.video.themoviedb.helper/crop_v2",
    "addons/packages",
];

/// Emit a progress tick every this many files during archive and extract.
pub const PROGRESS_EVERY_FILES: u64 = 100;

/// The two subtree names a backup preserves, in archive order.
pub const BACKUP_SUBTREES: &[&str] = &[USERDATA_DIR, ADDONS_DIR];
