use log::Level;
use serde_json::Value;

/// Structured fact sink. One fact is emitted per stage transition of an
/// operation; fields always carry the minimal envelope (`schema_version`,
/// `ts`, `op_id`, `path`, `decision`).
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Human-readable status line sink, fed the same messages a GUI status
/// window would show.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// Sink that discards everything; the default for tests and headless use.
#[derive(Default)]
pub struct NullSink;

impl FactsEmitter for NullSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for NullSink {
    fn log(&self, _level: Level, _msg: &str) {}
}

/// Audit sink that forwards to the `log` crate.
#[derive(Default)]
pub struct LogSink;

impl AuditSink for LogSink {
    fn log(&self, level: Level, msg: &str) {
        log::log!(level, "{msg}");
    }
}
