//! Restore workflow sequencing: validate archive, validate target, extract.

use std::time::Instant;

use serde_json::json;
use uuid::Uuid;

use crate::archive::{self, ExtractOutcome};
use crate::fs::format_size;
use crate::logging::audit::{AuditCtx, Stage, StageLogger};
use crate::logging::{AuditSink, FactsEmitter};
use crate::preflight;
use crate::types::{Error, ErrorKind, OperationResult, OperationStatus, RestoreDecision};

use super::backup_impl::{cancelled, fail, finish};
use super::{RestoreRequest, Vault};

pub(super) fn run<E: FactsEmitter, A: AuditSink>(
    v: &Vault<E, A>,
    req: &RestoreRequest,
) -> OperationResult {
    let started = Instant::now();
    let ctx = AuditCtx::new(&v.facts, Uuid::new_v4().to_string());
    let mut result = OperationResult::new(OperationStatus::Success);

    v.say(&format!("Validating backup file {}", req.archive.display()));
    let manifest = match preflight::validate_archive(&req.archive) {
        Ok(m) => m,
        Err(e) => return fail(&ctx, Stage::RestoreValidate, result, started, e),
    };
    v.say(&format!(
        "Backup file is valid: {} userdata files, {} addons files, {}",
        manifest.userdata_files,
        manifest.addons_files,
        format_size(manifest.total_bytes)
    ));
    let slog = StageLogger::new(&ctx);
    slog.stage(Stage::RestoreValidate)
        .path(req.archive.display().to_string())
        .field("entries", json!(manifest.entries.len()))
        .field("userdata_files", json!(manifest.userdata_files))
        .field("addons_files", json!(manifest.addons_files))
        .field("total_bytes", json!(manifest.total_bytes))
        .emit_success();

    let class = preflight::classify_restore_target(&req.target);
    let decision = preflight::validate_target(class);
    if let RestoreDecision::Refuse(reason) = &decision {
        v.say(&format!("Restore refused: {reason}"));
        let error = Error::new(ErrorKind::RefusedTarget, reason.clone());
        return fail(&ctx, Stage::RestoreValidate, result, started, error);
    }

    if v.cancel.is_cancelled() {
        return cancelled(&ctx, result, started);
    }

    if decision == RestoreDecision::ProceedWithClear {
        v.say("Clearing existing Kodi data...");
    }

    v.say("Extracting backup archive...");
    let outcome = match archive::restore(
        &req.archive,
        &req.target,
        &decision,
        v.reporter.as_ref(),
        &v.cancel,
    ) {
        Ok(outcome) => outcome,
        Err(e) => return fail(&ctx, Stage::RestoreExtract, result, started, e),
    };
    // Extraction only begins once any required clear has completed, so the
    // clear fact is only truthful from here on.
    if decision == RestoreDecision::ProceedWithClear {
        slog.stage(Stage::RestoreClear)
            .path(req.target.display().to_string())
            .emit_success();
    }
    match outcome {
        ExtractOutcome::Complete { files, bytes } => {
            result.bytes_after = bytes;
            v.say(&format!(
                "Restore completed successfully: {files} files, {}",
                format_size(bytes)
            ));
            slog.stage(Stage::RestoreExtract)
                .path(req.target.display().to_string())
                .field("files", json!(files))
                .field("bytes", json!(bytes))
                .emit_success();
        }
        ExtractOutcome::Failed {
            completed,
            bytes,
            error,
        } => {
            // Already-written files stay on disk; the caller is told exactly
            // how far extraction got.
            result.bytes_after = bytes;
            v.say(&format!(
                "Restore aborted after {} files: {error}",
                completed.len()
            ));
            slog.stage(Stage::RestoreExtract)
                .path(req.target.display().to_string())
                .field("completed", json!(completed.len()))
                .field("error", json!(error.to_string()))
                .emit_failure();
            result.status = OperationStatus::Failed;
            result.error = Some(error);
        }
        ExtractOutcome::Cancelled { completed, bytes } => {
            result.bytes_after = bytes;
            v.say(&format!("Restore cancelled after {} files", completed.len()));
            return cancelled(&ctx, result, started);
        }
    }

    finish(&ctx, result, started)
}
