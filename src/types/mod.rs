pub mod entrypath;
pub mod errors;
pub mod install;
pub mod manifest;
pub mod report;

pub use entrypath::*;
pub use errors::*;
pub use install::*;
pub use manifest::*;
pub use report::*;
