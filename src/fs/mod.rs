pub mod clean;
pub mod paths;
pub mod size;

pub use clean::{clean, CleanOutcome};
pub use paths::{dir_is_empty, fsync_parent_dir, is_filesystem_root, remove_any};
pub use size::{format_size, measure, measure_install, Measurement};
