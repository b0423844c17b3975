//! Non-destructive validation stages run before any mutation.
//!
//! Submodules:
//! - `install`: installation root validation and restore target classification
//! - `archive`: archive inspection (entry vetting) and the restore decision

pub mod archive;
pub mod install;

pub use archive::{validate_archive, validate_target};
pub use install::{classify_restore_target, validate_installation};
