//! File-backed config loading tests.

use std::io::Write;

use fw_config::{load_settings, validate_settings, ConfigPaths, ConfigSource};

fn paths_for(file: &std::path::Path) -> ConfigPaths {
    ConfigPaths {
        file: Some(file.to_path_buf()),
        source: ConfigSource::CliArgument,
    }
}

#[test]
fn load_full_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frostwatch.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(
        f,
        r#"
[detector]
window_size = 40
z_threshold = 3.0
sustained_secs = 300.0

[liveness]
heartbeat_interval_secs = 10.0
timeout_secs = 30.0

[storage]
ttl_days = 7
disk_budget_mb = 128
"#
    )
    .unwrap();

    let settings = load_settings(&paths_for(&path)).unwrap();
    assert_eq!(settings.detector.window_size, 40);
    assert_eq!(settings.detector.sustained_secs, 300.0);
    // Untouched fields keep their defaults.
    assert_eq!(settings.detector.retrain_interval_secs, 60.0);
    assert_eq!(settings.liveness.timeout_secs, 30.0);
    assert_eq!(settings.storage.ttl_days, 7);
    assert!(validate_settings(&settings).is_ok());
}

#[test]
fn parse_error_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frostwatch.toml");
    std::fs::write(&path, "[detector\nwindow_size = 20").unwrap();

    let err = load_settings(&paths_for(&path)).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("frostwatch.toml"), "error was: {}", text);
}

#[test]
fn invalid_values_parse_but_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frostwatch.toml");
    std::fs::write(
        &path,
        r#"
[detector]
window_size = 1
contamination = 0.9
"#,
    )
    .unwrap();

    let settings = load_settings(&paths_for(&path)).unwrap();
    let report = validate_settings(&settings);
    assert_eq!(report.errors.len(), 2);
}
