//! Archive naming, creation and extraction.

pub mod create;
pub mod extract;
pub mod name;

pub use create::{create, CreateOutcome};
pub use extract::{clear_previous_install, restore, ExtractOutcome};
pub use name::ArchiveName;
