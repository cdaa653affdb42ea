// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use crate::cli::{Cli, Command};
use clap::Parser;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["batchloc", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "batchloc",
        "-l",
        "5",
        "--ini",
        "a.toml",
        "--set",
        "batch/concurrency=8",
        "--log-file",
        "out.log",
        "options",
    ])
    .unwrap();

    assert_eq!(cli.global.log_level, Some(5));
    assert_eq!(cli.global.inis, [PathBuf::from("a.toml")]);
    assert_eq!(
        cli.global.to_config_overrides(),
        [
            "batch/concurrency=8",
            "global/output_log_level=5",
            "global/file_log_level=5",
            "global/log_file=out.log",
        ]
    );
}

#[test]
fn test_file_log_level_overrides_console_level() {
    let cli =
        Cli::try_parse_from(["batchloc", "-l", "2", "--file-log-level", "4", "inis"]).unwrap();
    assert_eq!(
        cli.global.to_config_overrides(),
        ["global/output_log_level=2", "global/file_log_level=4"]
    );
}

#[test]
fn test_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["batchloc", "-l", "7", "version"]).is_err());
}

#[test]
fn test_parse_run() {
    let cli = Cli::try_parse_from([
        "batchloc",
        "run",
        "backup",
        "a.json",
        "b.po",
        "--scan",
        "lang",
        "--select",
        "*.json",
        "--select",
        "**/*.po",
        "-y",
        "-j",
        "2",
        "--retries",
        "1",
        "--timeout-ms",
        "500",
        "--json",
        "--no-progress",
    ])
    .unwrap();

    let Some(Command::Run(args)) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.operation, "backup");
    assert_eq!(args.items, ["a.json", "b.po"]);
    assert_eq!(args.scan, Some(PathBuf::from("lang")));
    assert_eq!(args.select, ["*.json", "**/*.po"]);
    assert!(args.yes);
    assert_eq!(args.concurrency, Some(2));
    assert_eq!(args.retries, Some(1));
    assert_eq!(args.timeout_ms, Some(500));
    assert!(args.json);
    assert!(args.no_progress);
}

#[test]
fn test_run_requires_operation_and_positive_concurrency() {
    assert!(Cli::try_parse_from(["batchloc", "run"]).is_err());
    assert!(Cli::try_parse_from(["batchloc", "run", "validate", "-j", "0"]).is_err());
}

#[test]
fn test_parse_list_and_scan() {
    let cli = Cli::try_parse_from(["batchloc", "list", "--json"]).unwrap();
    assert!(matches!(cli.command, Some(Command::List(ref args)) if args.json));

    let cli = Cli::try_parse_from(["batchloc", "scan", "game/lang"]).unwrap();
    let Some(Command::Scan(args)) = cli.command else {
        panic!("expected scan command");
    };
    assert_eq!(args.dir, PathBuf::from("game/lang"));
    assert!(!args.json);
}
