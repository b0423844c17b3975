#![forbid(unsafe_code)]
//! kodibak: safe backup and restore of a Kodi configuration tree.
//!
//! Safety model highlights:
//! - Every destructive step is preceded by a non-mutating validation stage:
//!   installation roots are classified before cleanup, restore targets and
//!   archive entries are vetted before a single byte is extracted.
//! - Archives are written under a temporary name and renamed into place only
//!   after the container is finalized, so a crash never leaves a partial
//!   archive at the expected path.
//! - Cleanup only ever touches a fixed set of cache paths under the
//!   installation root; restore clearing only ever touches the `userdata`
//!   and `addons` subtrees of the target.

pub mod constants;
pub mod adapters;
pub mod api;
pub mod archive;
pub mod fs;
pub mod logging;
pub mod policy;
pub mod preflight;
pub mod types;

pub use api::*;
