//! Backup workflow sequencing: validate, measure, clean, measure, archive.

use std::time::Instant;

use serde_json::json;
use uuid::Uuid;

use crate::archive::{self, ArchiveName, CreateOutcome};
use crate::fs::{clean, format_size, measure_install};
use crate::logging::audit::{AuditCtx, Decision, Stage, StageLogger};
use crate::logging::{AuditSink, FactsEmitter};
use crate::preflight;
use crate::types::{Error, OperationResult, OperationStatus};

use super::{BackupRequest, Vault};

pub(super) fn run<E: FactsEmitter, A: AuditSink>(
    v: &Vault<E, A>,
    req: &BackupRequest,
) -> OperationResult {
    let started = Instant::now();
    let ctx = AuditCtx::new(&v.facts, Uuid::new_v4().to_string());
    let mut result = OperationResult::new(OperationStatus::Success);

    // A bad label must fail before anything on disk is touched.
    let name = match ArchiveName::today(req.label.as_deref()) {
        Ok(n) => n,
        Err(e) => return fail(&ctx, Stage::Validate, result, started, e),
    };

    v.say(&format!(
        "Validating installation at {}",
        req.installation.display()
    ));
    let install = match preflight::validate_installation(&req.installation) {
        Ok(i) => i,
        Err(e) => return fail(&ctx, Stage::Validate, result, started, e),
    };
    let slog = StageLogger::new(&ctx);
    if install.is_partial() {
        v.audit.log(
            log::Level::Warn,
            "Partial installation: only one of userdata/addons present",
        );
        slog.stage(Stage::Validate)
            .path(req.installation.display().to_string())
            .field("partial", json!(true))
            .emit_warn();
    } else {
        slog.stage(Stage::Validate)
            .path(req.installation.display().to_string())
            .emit_success();
    }

    v.say("Measuring size of Kodi userdata and addons before cleanup...");
    let before = measure_install(&install);
    result.bytes_before = before.bytes;
    result.skipped.extend(before.skipped);
    v.say(&format!("Current size: {}", format_size(before.bytes)));
    slog.stage(Stage::Measure)
        .field("bytes", json!(before.bytes))
        .emit_success();

    if v.cancel.is_cancelled() {
        return cancelled(&ctx, result, started);
    }

    v.say("Cleaning cache/temp folders...");
    let outcome = clean(install.path(), &req.cleanup, v.reporter.as_ref(), &v.cancel);
    let clean_decision = if outcome.skipped.is_empty() {
        Decision::Success
    } else {
        Decision::Warn
    };
    slog.stage(Stage::Clean)
        .field("bytes_freed", json!(outcome.bytes_freed))
        .field("removed", json!(outcome.removed))
        .field("skipped", json!(outcome.skipped.len()))
        .emit(clean_decision);
    result.skipped.extend(outcome.skipped);
    if outcome.cancelled {
        return cancelled(&ctx, result, started);
    }

    v.say("Measuring size after cleanup...");
    let after = measure_install(&install);
    result.bytes_after = after.bytes;
    result.skipped.extend(after.skipped);
    v.say(&format!(
        "Space freed: {}",
        format_size(result.bytes_freed())
    ));
    v.say(&format!("Size to backup: {}", format_size(after.bytes)));

    if v.cancel.is_cancelled() {
        return cancelled(&ctx, result, started);
    }

    v.say("Creating backup with compression...");
    v.say(&format!("Output: {}", name.file_name()));
    match archive::create(
        &install,
        &req.destination,
        &name,
        req.compression_level,
        v.reporter.as_ref(),
        &v.cancel,
    ) {
        Ok(CreateOutcome::Complete(desc)) => {
            v.say(&format!(
                "Backup complete! File: {}  Size: {}",
                name.file_name(),
                format_size(desc.archive_bytes)
            ));
            slog.stage(Stage::Archive)
                .path(desc.path.display().to_string())
                .field("entries", json!(desc.entries.len()))
                .field("archive_bytes", json!(desc.archive_bytes))
                .emit_success();
            result.archive = Some(desc.path);
        }
        Ok(CreateOutcome::Cancelled) => return cancelled(&ctx, result, started),
        Err(e) => return fail(&ctx, Stage::Archive, result, started, e),
    }

    finish(&ctx, result, started)
}

pub(super) fn fail(
    ctx: &AuditCtx<'_>,
    stage: Stage,
    mut result: OperationResult,
    started: Instant,
    error: Error,
) -> OperationResult {
    let slog = StageLogger::new(ctx);
    slog.stage(stage)
        .field("error", json!(error.to_string()))
        .emit_failure();
    result.status = OperationStatus::Failed;
    result.error = Some(error);
    finish(ctx, result, started)
}

pub(super) fn cancelled(
    ctx: &AuditCtx<'_>,
    mut result: OperationResult,
    started: Instant,
) -> OperationResult {
    result.status = OperationStatus::Cancelled;
    finish(ctx, result, started)
}

pub(super) fn finish(
    ctx: &AuditCtx<'_>,
    mut result: OperationResult,
    started: Instant,
) -> OperationResult {
    result.duration_ms = started.elapsed().as_millis() as u64;
    let (status, decision) = match result.status {
        OperationStatus::Success => ("success", Decision::Success),
        OperationStatus::Failed => ("failed", Decision::Failure),
        OperationStatus::Cancelled => ("cancelled", Decision::Warn),
    };
    let slog = StageLogger::new(ctx);
    slog.stage(Stage::Summary)
        .field("status", json!(status))
        .field("duration_ms", json!(result.duration_ms))
        .emit(decision);
    result
}
