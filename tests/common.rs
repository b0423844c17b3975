//! Shared test helpers for the kodibak crate integration tests.
#![allow(dead_code)]

use log::Level;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use kodibak::logging::{AuditSink, FactsEmitter};

/// A simple in-memory emitter to capture facts during tests.
#[derive(Clone, Default)]
pub struct TestEmitter {
    pub events: Arc<Mutex<Vec<(String, String, String, Value)>>>,
}

impl FactsEmitter for TestEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events
            .lock()
            .expect("events lock")
            .push((subsystem.into(), event.into(), decision.into(), fields));
    }
}

/// An audit sink that records every status line.
#[derive(Clone, Default)]
pub struct TestAudit {
    pub lines: Arc<Mutex<Vec<String>>>,
}

impl AuditSink for TestAudit {
    fn log(&self, _level: Level, msg: &str) {
        self.lines.lock().expect("lines lock").push(msg.to_string());
    }
}

/// Create a temp root for building installations and targets in.
pub fn with_temp_root() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

/// Write `size` deterministic bytes at `root/rel`, creating parents.
pub fn write_file(root: &Path, rel: &str, size: usize) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    let body: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    fs::write(&path, body).expect("write");
}

/// Lay down a small but realistic installation tree and return its root.
pub fn fixture_installation(root: &Path) {
    write_file(root, "userdata/guisettings.xml", 2_000);
    write_file(root, "userdata/sources.xml", 500);
    write_file(root, "userdata/Database/MyVideos.db", 3_000);
    write_file(
        root,
        "userdata/addon_data/plugin.video.umbrella/settings.xml",
        300,
    );
    write_file(root, "addons/plugin.video.umbrella/addon.xml", 1_200);
    write_file(root, "addons/script.module.cocoscrapers/addon.xml", 1_000);
}

/// Collect every file under `root` as (relative slash path, contents),
/// sorted, for byte-for-byte tree comparison.
pub fn snapshot_tree(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut out = Vec::new();
    for entry in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = entry.expect("walk");
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .expect("under root")
            .to_string_lossy()
            .replace('\\', "/");
        out.push((rel, fs::read(entry.path()).expect("read")));
    }
    out.sort();
    out
}
