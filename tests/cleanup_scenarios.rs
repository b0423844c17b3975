//! Cleanup accounting against the documented byte scenario.

mod common;

use common::{with_temp_root, write_file, TestAudit, TestEmitter};
use kodibak::fs::measure;
use kodibak::policy::{CleanupPolicy, OptionalCache};
use kodibak::types::OperationStatus;
use kodibak::{BackupRequest, Vault};

/// Scaled-down version of the reference scenario: thumbnails 50 KB, one
/// optional addon cache 10 KB, addon packages 5 KB, other content 8 KB.
fn scenario_installation(root: &std::path::Path) {
    write_file(root, "userdata/Thumbnails/a.jpg", 30_000);
    write_file(root, "userdata/Thumbnails/sub/b.jpg", 20_000);
    write_file(
        root,
        "userdata/addon_data/plugin.video.umbrella/cache.db",
        10_000,
    );
    write_file(root, "addons/packages/plugin.zip", 5_000);
    write_file(root, "userdata/guisettings.xml", 3_000);
    write_file(root, "addons/plugin.video.x/addon.xml", 5_000);
}

#[test]
fn default_cleanup_frees_the_mandatory_set_only() {
    let td = with_temp_root();
    let install = td.path().join("kodi");
    scenario_installation(&install);

    let vault = Vault::new(TestEmitter::default(), TestAudit::default());
    let result = vault.backup(&BackupRequest::new(&install, td.path().join("backups")));
    assert_eq!(result.status, OperationStatus::Success, "{:?}", result.error);

    assert_eq!(result.bytes_before, 73_000);
    assert_eq!(result.bytes_freed(), 55_000, "thumbnails + packages");
    assert_eq!(result.bytes_after, 18_000, "other content + optional cache");
    assert!(
        install
            .join("userdata/addon_data/plugin.video.umbrella/cache.db")
            .exists(),
        "optional cache survives without its flag"
    );
}

#[test]
fn enabled_optional_cache_is_freed_too() {
    let td = with_temp_root();
    let install = td.path().join("kodi");
    scenario_installation(&install);

    let cleanup = CleanupPolicy::default().with_enabled(OptionalCache::UmbrellaCache, true);
    let vault = Vault::new(TestEmitter::default(), TestAudit::default());
    let result = vault.backup(
        &BackupRequest::new(&install, td.path().join("backups")).with_cleanup(cleanup),
    );
    assert_eq!(result.status, OperationStatus::Success, "{:?}", result.error);

    assert_eq!(result.bytes_freed(), 65_000, "mandatory set + umbrella cache");
    assert_eq!(result.bytes_after, 8_000);
}

#[test]
fn second_backup_frees_nothing_more() {
    let td = with_temp_root();
    let install = td.path().join("kodi");
    scenario_installation(&install);
    let dest = td.path().join("backups");

    let vault = Vault::new(TestEmitter::default(), TestAudit::default());
    let first = vault.backup(&BackupRequest::new(&install, &dest).with_label("one"));
    assert_eq!(first.bytes_freed(), 55_000);

    let second = vault.backup(&BackupRequest::new(&install, &dest).with_label("two"));
    assert_eq!(second.status, OperationStatus::Success, "{:?}", second.error);
    assert_eq!(second.bytes_freed(), 0, "cleanup is idempotent");
    assert!(second.skipped.is_empty());

    // The archived payload is what survived cleanup.
    assert_eq!(measure(&install.join("userdata")).bytes, 13_000);
    assert_eq!(measure(&install.join("addons")).bytes, 5_000);
}
