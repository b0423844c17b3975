//! Stage-scoped fact emission for backup and restore operations.
//!
//! Every fact carries a minimal envelope: `schema_version`, `ts`, `op_id`,
//! `path`, `decision`. Facts are one-way; the engine never waits on a sink.

use chrono::Utc;
use serde_json::{json, Value};

use crate::logging::FactsEmitter;

pub(crate) const SCHEMA_VERSION: i64 = 1;
pub(crate) const SUBSYSTEM: &str = "kodibak";

/// Per-operation emission context: the sink plus the operation id stamped
/// onto every fact.
pub(crate) struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub op_id: String,
}

impl<'a> AuditCtx<'a> {
    pub(crate) fn new(facts: &'a dyn FactsEmitter, op_id: String) -> Self {
        Self { facts, op_id }
    }
}

/// Workflow stage a fact belongs to.
#[derive(Clone, Copy, Debug)]
pub enum Stage {
    Validate,
    Measure,
    Clean,
    Archive,
    RestoreValidate,
    RestoreClear,
    RestoreExtract,
    Summary,
}

impl Stage {
    fn as_event(self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::Measure => "measure",
            Stage::Clean => "clean",
            Stage::Archive => "archive",
            Stage::RestoreValidate => "restore.validate",
            Stage::RestoreClear => "restore.clear",
            Stage::RestoreExtract => "restore.extract",
            Stage::Summary => "summary",
        }
    }
}

/// Decision severity for audit events.
#[derive(Clone, Copy, Debug)]
pub enum Decision {
    Success,
    Failure,
    Warn,
}

impl Decision {
    fn as_str(self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
        }
    }
}

/// Builder facade over fact emission with a centralized envelope.
pub(crate) struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub(crate) fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub(crate) fn stage(&'a self, stage: Stage) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, stage)
    }
}

pub(crate) struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    pub(crate) fn path(mut self, path: impl Into<String>) -> Self {
        self.fields.insert("path".into(), json!(path.into()));
        self
    }

    pub(crate) fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub(crate) fn emit(self, decision: Decision) {
        let mut fields = Value::Object(self.fields);
        if let Some(obj) = fields.as_object_mut() {
            obj.entry("schema_version")
                .or_insert(json!(SCHEMA_VERSION));
            obj.entry("ts").or_insert(json!(Utc::now().to_rfc3339()));
            obj.entry("op_id").or_insert(json!(self.ctx.op_id));
            obj.entry("path").or_insert(json!(""));
            obj.entry("decision").or_insert(json!(decision.as_str()));
        }
        self.ctx
            .facts
            .emit(SUBSYSTEM, self.stage.as_event(), decision.as_str(), fields);
    }

    pub(crate) fn emit_success(self) {
        self.emit(Decision::Success);
    }

    pub(crate) fn emit_failure(self) {
        self.emit(Decision::Failure);
    }

    pub(crate) fn emit_warn(self) {
        self.emit(Decision::Warn);
    }
}
