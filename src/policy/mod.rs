//! Cleanup policy configuration.
//!
//! The `policy` module centralizes which cache paths a backup run prunes
//! before archiving. Consumers typically start from
//! [`CleanupPolicy::default`] (mandatory set only) and toggle the optional
//! caches per run; the mandatory set itself is never configurable.

pub mod config;

pub use config::{CleanupPolicy, OptionalCache};
