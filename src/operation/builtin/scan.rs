// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Discovery of translatable files below a folder.
//!
//! ```text
//! root --> ignore::WalkParallel (hidden, depth, excluded dirs)
//!            |  per file: extension + size filter
//!            v
//!        flume channel --> sorted Vec<PathBuf>
//!            |
//!            v  scan_folder: size, type, entry estimate
//!        ScanSummary (per-type counts, totals)
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use flume::{Sender, bounded};
use ignore::WalkBuilder;
use serde::Serialize;
use tracing::warn;

use super::files::FileType;
use crate::config::types::ScanSettings;
use crate::error::Result;

/// A translatable file found by [`scan_folder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path below the scanned root.
    pub relative_path: PathBuf,
    pub file_type: FileType,
    pub size_bytes: u64,
    /// `None` when the file could not be read as UTF-8.
    pub entry_count: Option<usize>,
}

/// Files and bytes found for one file type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTypeCount {
    pub file_type: FileType,
    pub count: usize,
    pub total_size: u64,
}

/// Result of [`scan_folder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub root_path: PathBuf,
    /// Sorted by path.
    pub files: Vec<ScannedFile>,
    pub total_files: usize,
    pub total_size_bytes: u64,
    /// One entry per type present, in `FileType` order.
    pub file_type_counts: Vec<FileTypeCount>,
    pub estimated_entries: usize,
}

/// Scans `root` and describes every translatable file in it.
///
/// # Errors
///
/// Same as [`scan_translatable_files`].
pub fn scan_folder<P: AsRef<Path>>(root: P, settings: &ScanSettings) -> Result<ScanSummary> {
    let root = root.as_ref();
    let files: Vec<ScannedFile> = scan_translatable_files(root, settings)?
        .into_iter()
        .map(|path| describe_file(root, path))
        .collect();

    let mut by_type: BTreeMap<FileType, FileTypeCount> = BTreeMap::new();
    for file in &files {
        let counts = by_type.entry(file.file_type).or_insert(FileTypeCount {
            file_type: file.file_type,
            count: 0,
            total_size: 0,
        });
        counts.count += 1;
        counts.total_size += file.size_bytes;
    }

    Ok(ScanSummary {
        root_path: root.to_path_buf(),
        total_files: files.len(),
        total_size_bytes: files.iter().map(|f| f.size_bytes).sum(),
        file_type_counts: by_type.into_values().collect(),
        estimated_entries: files.iter().filter_map(|f| f.entry_count).sum(),
        files,
    })
}

fn describe_file(root: &Path, path: PathBuf) -> ScannedFile {
    let file_type = FileType::from_path(&path);
    let size_bytes = std::fs::metadata(&path).map_or(0, |m| m.len());
    let entry_count = std::fs::read_to_string(&path)
        .ok()
        .map(|content| file_type.estimate_entries(&content));
    let relative_path = path
        .strip_prefix(root)
        .map_or_else(|_| path.clone(), Path::to_path_buf);

    ScannedFile {
        path,
        relative_path,
        file_type,
        size_bytes,
        entry_count,
    }
}

/// Returns every translatable file below `root`, sorted by path.
///
/// Files are kept when their lowercase extension is listed in
/// `include_extensions` (or the list is empty), their type is translatable,
/// and their size is within `max_size_bytes`. Directories named in
/// `exclude_dirs` are never descended into. `.gitignore` files are not
/// consulted.
///
/// # Errors
///
/// Returns an error if `root` does not exist or is not a directory.
pub fn scan_translatable_files<P: AsRef<Path>>(
    root: P,
    settings: &ScanSettings,
) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.exists() {
        anyhow::bail!("folder not found: {}", root.display());
    }
    if !root.is_dir() {
        anyhow::bail!("not a folder: {}", root.display());
    }

    let include: Arc<BTreeSet<String>> = Arc::new(
        settings
            .include_extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect(),
    );

    let (file_tx, file_rx) = bounded::<PathBuf>(1000);
    let error_count = Arc::new(AtomicUsize::new(0));

    // The walk blocks until done, so it runs on its own thread while this
    // one drains the channel.
    let mut files: Vec<PathBuf> = std::thread::scope(|scope| {
        let walk_errors = Arc::clone(&error_count);
        scope.spawn(move || walk_into(root, settings, &include, &file_tx, &walk_errors));
        file_rx.iter().collect()
    });
    files.sort();

    let errors = error_count.load(Ordering::Relaxed);
    tracing::debug!(root = %root.display(), files = files.len(), errors, "Scan finished");

    Ok(files)
}

fn walk_into(
    root: &Path,
    settings: &ScanSettings,
    include: &Arc<BTreeSet<String>>,
    file_tx: &Sender<PathBuf>,
    error_count: &Arc<AtomicUsize>,
) {
    let max_size = settings.max_size_bytes;
    build_walker(root, settings).build_parallel().run(|| {
        let file_tx = file_tx.clone();
        let include = Arc::clone(include);
        let error_count = Arc::clone(error_count);

        Box::new(move |entry_result| {
            match entry_result {
                Ok(entry) if entry.file_type().is_some_and(|ft| ft.is_file()) => {
                    let path = entry.path();
                    let extension = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .map(str::to_ascii_lowercase)
                        .unwrap_or_default();

                    let included = include.is_empty() || include.contains(&extension);
                    let within_size = max_size.is_none_or(|max| {
                        entry.metadata().map(|m| m.len() <= max).unwrap_or(false)
                    });

                    if included
                        && within_size
                        && FileType::from_extension(&extension).is_translatable()
                    {
                        // The receiver outlives the walk.
                        let _ = file_tx.send(path.to_path_buf());
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "scan error");
                    error_count.fetch_add(1, Ordering::Relaxed);
                }
            }
            ignore::WalkState::Continue
        })
    });
}

fn build_walker(root: &Path, settings: &ScanSettings) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    builder.max_depth(settings.max_depth);
    builder.follow_links(false);
    builder.hidden(settings.skip_hidden);
    builder.git_ignore(false);
    builder.git_global(false);
    builder.git_exclude(false);
    builder.ignore(false);
    builder.parents(false);

    if !settings.exclude_dirs.is_empty() {
        let exclude: Arc<Vec<String>> = Arc::new(settings.exclude_dirs.clone());
        builder.filter_entry(move |entry| {
            !(entry.file_type().is_some_and(|ft| ft.is_dir())
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| exclude.iter().any(|skip| skip == name)))
        });
    }

    builder
}
