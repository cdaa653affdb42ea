// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scan command implementation for batchloc.

use crate::cli::run::ScanArgs;
use crate::config::Config;
use crate::error::Result;
use crate::operation::builtin::scan::{ScanSummary, scan_folder};

/// Main handler for scan command.
///
/// # Errors
///
/// Returns an error if the folder cannot be scanned.
pub fn run_scan_command(args: &ScanArgs, config: &Config) -> Result<()> {
    let summary = scan_folder(&args.dir, &config.scan)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for line in format_summary(&summary) {
        println!("{line}");
    }
    Ok(())
}

/// Renders one line per file, then per-type counts and totals.
#[must_use]
pub fn format_summary(summary: &ScanSummary) -> Vec<String> {
    if summary.files.is_empty() {
        return vec![format!(
            "No translatable files found in {}",
            summary.root_path.display()
        )];
    }

    let mut lines: Vec<String> = summary
        .files
        .iter()
        .map(|file| {
            let entries = file
                .entry_count
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            format!(
                "{:<12} {:>10} {:>8}  {}",
                format!("{:?}", file.file_type),
                file.size_bytes,
                entries,
                file.relative_path.display()
            )
        })
        .collect();

    lines.push(String::new());
    lines.extend(summary.file_type_counts.iter().map(|counts| {
        format!(
            "{:<12} {:>4} files {:>10} bytes",
            format!("{:?}", counts.file_type),
            counts.count,
            counts.total_size
        )
    }));
    lines.push(format!(
        "{} files, {} bytes, about {} entries",
        summary.total_files, summary.total_size_bytes, summary.estimated_entries
    ));
    lines
}

#[cfg(test)]
mod tests;
