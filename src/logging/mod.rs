pub mod audit;
pub mod facts;

pub use audit::{Decision, Stage};
pub use facts::{AuditSink, FactsEmitter, LogSink, NullSink};
