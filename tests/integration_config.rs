// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML configurations.

use std::fs;

use batchloc::batch::BatchOperationConfig;
use batchloc::config::Config;
use batchloc::config::loader::ConfigLoader;
use batchloc::logging::LogLevel;
use tempfile::TempDir;

// =============================================================================
// Loading from TOML strings
// =============================================================================

#[test]
fn config_parse_empty_uses_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.batch.concurrency, 4);
    assert_eq!(config.batch.retry_attempts, 0);
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert!(config.scan.skip_hidden);
    assert!(config.operations.is_empty());
}

#[test]
fn config_parse_full_file() {
    let toml = r#"
[global]
output_log_level = 4
log_file = "batchloc.log"

[batch]
concurrency = 6
retry_attempts = 2
retry_delay_ms = 100
item_timeout_ms = 30000

[scan]
include_extensions = ["json", "po"]
exclude_dirs = ["backup"]
max_depth = 3
skip_hidden = false

[operations.validate]
concurrency = 16

[operations."*-backup"]
retry_attempts = 0
"#;
    let config = Config::parse(toml).unwrap();
    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.scan.include_extensions, ["json", "po"]);
    assert_eq!(config.scan.max_depth, Some(3));

    let validate = config.batch_settings("validate");
    assert_eq!(validate.concurrency, 16);
    assert_eq!(validate.retry_attempts, 2);

    let remove = config.batch_settings("remove-backup");
    assert_eq!(remove.concurrency, 6);
    assert_eq!(remove.retry_attempts, 0);

    let runner_config = BatchOperationConfig::from_settings(&config.batch_settings("backup"));
    assert_eq!(runner_config.concurrency(), 6);
    assert_eq!(
        runner_config.item_timeout(),
        Some(std::time::Duration::from_secs(30))
    );
}

#[test]
fn config_parse_invalid_log_level() {
    let err = Config::parse("[global]\noutput_log_level = 9\n").unwrap_err();
    assert!(format!("{err:#}").contains("log level must be 0-6"));
}

#[test]
fn config_parse_invalid_toml() {
    assert!(Config::parse("[batch\nconcurrency = ").is_err());
}

// =============================================================================
// Layered loading
// =============================================================================

#[test]
fn config_later_files_win() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base.toml");
    let local = dir.path().join("local.toml");
    fs::write(&base, "[batch]\nconcurrency = 2\nretry_attempts = 3\n").unwrap();
    fs::write(&local, "[batch]\nconcurrency = 5\n").unwrap();

    let config = ConfigLoader::new()
        .add_toml_file(&base)
        .add_toml_file(&local)
        .build()
        .unwrap();
    assert_eq!(config.batch.concurrency, 5);
    assert_eq!(config.batch.retry_attempts, 3);
}

#[test]
fn config_overrides_beat_files() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("batchloc.toml");
    fs::write(&file, "[batch]\nconcurrency = 2\n").unwrap();

    let config = ConfigLoader::new()
        .add_toml_file(&file)
        .apply_overrides(&[
            "batch/concurrency=9".to_string(),
            "scan/skip_hidden=false".to_string(),
        ])
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.batch.concurrency, 9);
    assert!(!config.scan.skip_hidden);
}

#[test]
fn config_missing_required_file_fails() {
    let dir = TempDir::new().unwrap();
    let result = ConfigLoader::new()
        .add_toml_file(dir.path().join("missing.toml"))
        .build();
    assert!(result.is_err());
}

#[test]
fn config_missing_optional_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    let loader = ConfigLoader::new().add_toml_file_optional(dir.path().join("missing.toml"));
    assert!(loader.format_loaded_files().is_empty());
    assert_eq!(loader.build().unwrap().batch.concurrency, 4);
}

#[test]
fn config_from_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("settings.toml");
    fs::write(&file, "[operations.backup]\nconcurrency = 1\n").unwrap();

    let config = Config::from_file(&file).unwrap();
    assert_eq!(config.batch_settings("backup").concurrency, 1);
    assert!(
        config
            .format_options()
            .contains(&"operations.backup.concurrency = 1".to_string())
    );
}
