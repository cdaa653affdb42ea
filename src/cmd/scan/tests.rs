// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use super::format_summary;
use crate::operation::builtin::files::FileType;
use crate::operation::builtin::scan::{FileTypeCount, ScanSummary, ScannedFile};

fn file(relative: &str, file_type: FileType, size_bytes: u64, entries: Option<usize>) -> ScannedFile {
    ScannedFile {
        path: PathBuf::from("lang").join(relative),
        relative_path: PathBuf::from(relative),
        file_type,
        size_bytes,
        entry_count: entries,
    }
}

fn count(file_type: FileType, total_size: u64) -> FileTypeCount {
    FileTypeCount {
        file_type,
        count: 1,
        total_size,
    }
}

#[test]
fn test_format_summary() {
    let summary = ScanSummary {
        root_path: PathBuf::from("lang"),
        files: vec![
            file("en.json", FileType::Json, 120, Some(4)),
            file("ui/fr.po", FileType::Po, 64, Some(2)),
            file("notes.txt", FileType::Txt, 10, None),
        ],
        total_files: 3,
        total_size_bytes: 194,
        file_type_counts: vec![
            count(FileType::Json, 120),
            count(FileType::Po, 64),
            count(FileType::Txt, 10),
        ],
        estimated_entries: 6,
    };

    insta::assert_snapshot!(format_summary(&summary).join("\n"), @r"
    Json                120        4  en.json
    Po                   64        2  ui/fr.po
    Txt                  10        -  notes.txt

    Json            1 files        120 bytes
    Po              1 files         64 bytes
    Txt             1 files         10 bytes
    3 files, 194 bytes, about 6 entries
    ");
}

#[test]
fn test_format_empty_summary() {
    let summary = ScanSummary {
        root_path: PathBuf::from("lang"),
        files: Vec::new(),
        total_files: 0,
        total_size_bytes: 0,
        file_type_counts: Vec::new(),
        estimated_entries: 0,
    };
    assert_eq!(
        format_summary(&summary),
        ["No translatable files found in lang"]
    );
}
