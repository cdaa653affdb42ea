// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::files::FileType;
use super::scan::{scan_folder, scan_translatable_files};
use super::{ExportOperation, backup_path, registry, registry_with_export};
use crate::config::types::{OutputSettings, ScanSettings};
use crate::operation::{BatchOperation, ItemContext};

fn ctx() -> ItemContext {
    ItemContext::new(CancellationToken::new(), 1)
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

// --- FileType ---

#[test]
fn test_file_type_from_extension() {
    assert_eq!(FileType::from_extension("JSON"), FileType::Json);
    assert_eq!(FileType::from_extension("pot"), FileType::Po);
    assert_eq!(FileType::from_extension("yml"), FileType::Yaml);
    assert_eq!(FileType::from_extension("ssa"), FileType::Ass);
    assert_eq!(FileType::from_extension("exe"), FileType::Unknown);
    assert_eq!(FileType::from_path(Path::new("a/b/strings.resx")), FileType::Resx);
    assert_eq!(FileType::from_path(Path::new("Makefile")), FileType::Unknown);
    assert!(!FileType::Unknown.is_translatable());
    assert!(FileType::Srt.is_translatable());
}

#[test]
fn test_estimate_json_counts_keys() {
    let content = r#"{ "menu": { "start": "Start", "quit": "Quit: now" }, "title": "Game" }"#;
    assert_eq!(FileType::Json.estimate_entries(content), 4);
}

#[test]
fn test_estimate_po_skips_header() {
    let content = "msgid \"\"\nmsgstr \"\"\n\nmsgid \"Hello\"\nmsgstr \"Hallo\"\n\nmsgid \"Bye\"\nmsgstr \"\"\n";
    assert_eq!(FileType::Po.estimate_entries(content), 2);
}

#[test]
fn test_estimate_subtitles() {
    let srt = "1\r\n00:00:01,000 --> 00:00:02,000\r\nHi\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nBye\r\n";
    assert_eq!(FileType::Srt.estimate_entries(srt), 2);

    let ass = "[Events]\nFormat: Layer, Text\nDialogue: 0,Hello\nComment: 0,skip\nDialogue: 0,World\n";
    assert_eq!(FileType::Ass.estimate_entries(ass), 2);
}

#[test]
fn test_estimate_tabular_and_keyed() {
    assert_eq!(FileType::Csv.estimate_entries("key,text\na,A\nb,B\n"), 2);
    assert_eq!(FileType::Csv.estimate_entries(""), 0);
    assert_eq!(
        FileType::Properties.estimate_entries("# comment\n! also\n\na=1\nb=2\n"),
        2
    );
    assert_eq!(
        FileType::Resx.estimate_entries("<root><data name=\"a\"/><data name=\"b\"></data><database/></root>"),
        2
    );
    assert_eq!(FileType::Txt.estimate_entries("one\n\n  \ntwo\n"), 2);
}

// --- Registry ---

#[test]
fn test_builtin_registry() {
    let registry = registry().unwrap();
    let ids: Vec<_> = registry.descriptors().map(|d| d.id().to_string()).collect();
    assert_eq!(
        ids,
        ["estimate-entries", "validate", "backup", "remove-backup", "export"]
    );
    assert!(registry.get("remove-backup").unwrap().descriptor().requires_confirmation());
    assert!(!registry.get("backup").unwrap().descriptor().requires_confirmation());
}

#[test]
fn test_backup_path_appends_extension() {
    assert_eq!(
        backup_path(Path::new("lang/en.json")),
        Path::new("lang/en.json.bak")
    );
}

// --- Operations ---

#[tokio::test]
async fn test_estimate_entries_operation() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "en.json", r#"{"a": "A", "b": "B"}"#);
    let op = registry().unwrap().get("estimate-entries").unwrap();

    let value = op.process_item(&file, &ctx()).await.unwrap();
    assert_eq!(value["entries"], 2);
    assert_eq!(value["fileType"], "json");

    let unknown = write(dir.path(), "blob.bin", "xx");
    let err = op.process_item(&unknown, &ctx()).await.unwrap_err();
    assert!(err.to_string().contains("unsupported file type"));
}

#[tokio::test]
async fn test_validate_operation() {
    let dir = TempDir::new().unwrap();
    let good = write(dir.path(), "ok.json", r#"{"a": 1}"#);
    let bad = write(dir.path(), "bad.json", r#"{"a": "#);
    let empty = write(dir.path(), "empty.txt", "  \n");
    let op = registry().unwrap().get("validate").unwrap();

    assert_eq!(op.process_item(&good, &ctx()).await.unwrap()["valid"], true);
    assert!(
        op.process_item(&bad, &ctx())
            .await
            .unwrap_err()
            .to_string()
            .contains("not valid JSON")
    );
    assert!(
        op.process_item(&empty, &ctx())
            .await
            .unwrap_err()
            .to_string()
            .contains("is empty")
    );
}

#[tokio::test]
async fn test_backup_then_remove() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "de.po", "msgid \"a\"\n");
    let registry = registry().unwrap();

    registry.get("backup").unwrap().process_item(&file, &ctx()).await.unwrap();
    let backup = backup_path(Path::new(&file));
    assert_eq!(fs::read_to_string(&backup).unwrap(), "msgid \"a\"\n");

    registry
        .get("remove-backup")
        .unwrap()
        .process_item(&file, &ctx())
        .await
        .unwrap();
    assert!(!backup.exists());
    assert!(Path::new(&file).exists());
}

#[tokio::test]
async fn test_operation_refuses_when_cancelled() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "fr.txt", "bonjour");
    let token = CancellationToken::new();
    token.cancel();
    let ctx = ItemContext::new(token, 1);

    let op = registry().unwrap().get("backup").unwrap();
    assert!(op.process_item(&file, &ctx).await.is_err());
    assert!(!backup_path(Path::new(&file)).exists());
}

// --- Scan ---

#[test]
fn test_scan_filters_and_sorts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.json", "{}");
    write(dir.path(), "a.po", "");
    write(dir.path(), "sub/c.srt", "");
    write(dir.path(), "image.png", "");
    write(dir.path(), "node_modules/skip.json", "{}");
    write(dir.path(), ".hidden/skip.json", "{}");

    let files = scan_translatable_files(dir.path(), &ScanSettings::default()).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| {
            p.strip_prefix(dir.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(names, ["a.po", "b.json", "sub/c.srt"]);
}

#[test]
fn test_scan_respects_depth_and_size() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "top.txt", "12345");
    write(dir.path(), "deep/nested.txt", "1");

    let settings = ScanSettings {
        max_depth: Some(1),
        max_size_bytes: Some(3),
        ..ScanSettings::default()
    };
    assert!(scan_translatable_files(dir.path(), &settings).unwrap().is_empty());

    let settings = ScanSettings {
        include_extensions: vec!["TXT".to_string()],
        max_size_bytes: None,
        ..ScanSettings::default()
    };
    assert_eq!(scan_translatable_files(dir.path(), &settings).unwrap().len(), 2);
}

#[test]
fn test_scan_missing_root() {
    let dir = TempDir::new().unwrap();
    let err = scan_translatable_files(dir.path().join("nope"), &ScanSettings::default())
        .unwrap_err();
    assert!(err.to_string().starts_with("folder not found"));

    let file = write(dir.path(), "file.txt", "x");
    assert!(scan_translatable_files(&file, &ScanSettings::default()).is_err());
}

#[test]
fn test_scan_more_files_than_channel_capacity() {
    let dir = TempDir::new().unwrap();
    for i in 0..1100 {
        fs::write(dir.path().join(format!("s{i:04}.json")), "{}").unwrap();
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let root = dir.path().to_path_buf();
    std::thread::spawn(move || {
        let _ = tx.send(scan_translatable_files(&root, &ScanSettings::default()));
    });

    let files = rx
        .recv_timeout(std::time::Duration::from_secs(20))
        .expect("scan should finish")
        .unwrap();
    assert_eq!(files.len(), 1100);
    assert!(files.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_scan_folder_summary() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "en.json", r#"{"a": "A", "b": "B"}"#);
    write(dir.path(), "ui/de.json", r#"{"a": "A"}"#);
    write(dir.path(), "ui/fr.po", "msgid \"\"\nmsgstr \"\"\n\nmsgid \"a\"\nmsgstr \"b\"\n");
    fs::write(dir.path().join("bad.txt"), [0xffu8, 0xfe]).unwrap();

    let summary = scan_folder(dir.path(), &ScanSettings::default()).unwrap();
    let relative: Vec<_> = summary
        .files
        .iter()
        .map(|f| f.relative_path.to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(relative, ["bad.txt", "en.json", "ui/de.json", "ui/fr.po"]);
    assert_eq!(summary.total_files, 4);
    assert_eq!(summary.files[0].entry_count, None);
    assert_eq!(summary.estimated_entries, 4);
    assert_eq!(
        summary.total_size_bytes,
        summary.files.iter().map(|f| f.size_bytes).sum::<u64>()
    );

    let counts: Vec<_> = summary
        .file_type_counts
        .iter()
        .map(|c| (c.file_type, c.count))
        .collect();
    assert_eq!(
        counts,
        [(FileType::Json, 2), (FileType::Po, 1), (FileType::Txt, 1)]
    );

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["totalFiles"], 4);
    assert_eq!(json["fileTypeCounts"][0]["fileType"], "json");
    assert_eq!(json["files"][1]["entryCount"], 2);
}

// --- Export ---

#[test]
fn test_export_target_paths() {
    let sibling = ExportOperation::default();
    assert_eq!(
        sibling.target_path(Path::new("lang/en.json")),
        Some(PathBuf::from("lang/en_translated.json"))
    );
    assert_eq!(
        sibling.target_path(Path::new("lang/README")),
        Some(PathBuf::from("lang/README_translated"))
    );

    let mirrored = ExportOperation::new(OutputSettings {
        dir: Some(PathBuf::from("out")),
        ..OutputSettings::default()
    })
    .with_source_root("lang");
    assert_eq!(
        mirrored.target_path(Path::new("lang/ui/fr.po")),
        Some(PathBuf::from("out/ui/fr.po"))
    );
    assert_eq!(
        mirrored.target_path(Path::new("other/de.po")),
        Some(PathBuf::from("out/de.po"))
    );
    assert_eq!(mirrored.target_path(Path::new("/")), None);
}

#[tokio::test]
async fn test_export_keeps_relative_structure() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let nested = write(source.path(), "ui/menu/fr.po", "msgid \"a\"\n");
    let top = write(source.path(), "en.json", "{}");

    let registry = registry_with_export(
        ExportOperation::new(OutputSettings {
            dir: Some(output.path().to_path_buf()),
            ..OutputSettings::default()
        })
        .with_source_root(source.path()),
    )
    .unwrap();
    let op = registry.get("export").unwrap();

    let value = op.process_item(&nested, &ctx()).await.unwrap();
    let exported = output.path().join("ui/menu/fr.po");
    assert_eq!(value["output"], exported.display().to_string());
    assert_eq!(fs::read_to_string(&exported).unwrap(), "msgid \"a\"\n");

    op.process_item(&top, &ctx()).await.unwrap();
    assert!(output.path().join("en.json").exists());
    assert!(Path::new(&nested).exists());
}

#[tokio::test]
async fn test_export_refuses_to_overwrite_source() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "en.json", r#"{"a": 1}"#);
    let op = ExportOperation::new(OutputSettings {
        dir: Some(dir.path().join(".")),
        ..OutputSettings::default()
    })
    .with_source_root(dir.path());

    let err = op.process_item(&file, &ctx()).await.unwrap_err();
    assert!(err.to_string().contains("onto itself"));
    assert_eq!(fs::read_to_string(&file).unwrap(), r#"{"a": 1}"#);

    let sibling = ExportOperation::default();
    sibling.process_item(&file, &ctx()).await.unwrap();
    assert!(dir.path().join("en_translated.json").exists());
}
