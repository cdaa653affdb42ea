// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Built-in file operations.
//!
//! Every item id is a file path. The operations are registered in the
//! order the CLI lists them.
//!
//! ```text
//! estimate-entries   read file, detect FileType, count entries
//! validate           non-empty UTF-8, JSON must parse
//! backup             copy <path> to <path>.bak
//! remove-backup      delete <path>.bak (requires confirmation)
//! export             copy into [output] dir keeping the relative path,
//!                    or next to the source as <stem>_translated.<ext>
//! ```

pub mod files;
pub mod scan;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use futures_util::future::BoxFuture;
use serde_json::json;

use self::files::FileType;
use super::registry::OperationRegistry;
use super::{BatchOperation, ItemContext, OperationDescriptor};
use crate::config::types::OutputSettings;
use crate::error::{BatchlocResult, Result};

/// Extension appended to backup copies.
pub const BACKUP_EXTENSION: &str = "bak";

/// Builds the registry of built-in operations with default output settings.
///
/// # Errors
///
/// Only fails if two built-ins share an id.
pub fn registry() -> BatchlocResult<OperationRegistry> {
    registry_with_export(ExportOperation::default())
}

/// Builds the registry of built-in operations around a configured `export`.
///
/// # Errors
///
/// Only fails if two built-ins share an id.
pub fn registry_with_export(export: ExportOperation) -> BatchlocResult<OperationRegistry> {
    OperationRegistry::from_operations([
        Arc::new(EstimateEntriesOperation::new()) as Arc<dyn BatchOperation>,
        Arc::new(ValidateOperation::new()),
        Arc::new(BackupOperation::new()),
        Arc::new(RemoveBackupOperation::new()),
        Arc::new(export),
    ])
}

/// Returns the backup path for `path` (`name.ext` becomes `name.ext.bak`).
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(BACKUP_EXTENSION);
    PathBuf::from(name)
}

fn ensure_not_cancelled(ctx: &ItemContext) -> Result<()> {
    if ctx.is_cancelled() {
        anyhow::bail!("cancelled before start");
    }
    Ok(())
}

async fn read_text(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", path.display()))
}

async fn same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// --- estimate-entries ---

/// Counts translatable entries per file.
#[derive(Debug)]
pub struct EstimateEntriesOperation {
    descriptor: OperationDescriptor,
}

impl EstimateEntriesOperation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: OperationDescriptor::new("estimate-entries", "Estimate entries"),
        }
    }
}

impl Default for EstimateEntriesOperation {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchOperation for EstimateEntriesOperation {
    fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    fn process_item<'a>(
        &'a self,
        item_id: &'a str,
        ctx: &'a ItemContext,
    ) -> BoxFuture<'a, Result<serde_json::Value>> {
        Box::pin(async move {
            ensure_not_cancelled(ctx)?;
            let path = Path::new(item_id);
            let file_type = FileType::from_path(path);
            if !file_type.is_translatable() {
                anyhow::bail!("unsupported file type: {item_id}");
            }

            let content = read_text(path).await?;
            let entries = file_type.estimate_entries(&content);
            tracing::debug!(file = %item_id, ?file_type, entries, "Estimated entries");

            Ok(json!({
                "fileType": file_type,
                "entries": entries,
                "bytes": content.len(),
            }))
        })
    }
}

// --- validate ---

/// Checks that a file is non-empty UTF-8 and, for JSON, well-formed.
#[derive(Debug)]
pub struct ValidateOperation {
    descriptor: OperationDescriptor,
}

impl ValidateOperation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: OperationDescriptor::new("validate", "Validate files"),
        }
    }
}

impl Default for ValidateOperation {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchOperation for ValidateOperation {
    fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    fn process_item<'a>(
        &'a self,
        item_id: &'a str,
        ctx: &'a ItemContext,
    ) -> BoxFuture<'a, Result<serde_json::Value>> {
        Box::pin(async move {
            ensure_not_cancelled(ctx)?;
            let path = Path::new(item_id);
            let content = read_text(path).await?;
            if content.trim().is_empty() {
                anyhow::bail!("{item_id} is empty");
            }

            let file_type = FileType::from_path(path);
            if file_type == FileType::Json {
                serde_json::from_str::<serde_json::Value>(&content)
                    .with_context(|| format!("{item_id} is not valid JSON"))?;
            }

            Ok(json!({ "fileType": file_type, "valid": true }))
        })
    }
}

// --- backup ---

/// Copies each file next to itself with a `.bak` suffix.
#[derive(Debug)]
pub struct BackupOperation {
    descriptor: OperationDescriptor,
}

impl BackupOperation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: OperationDescriptor::new("backup", "Back up files"),
        }
    }
}

impl Default for BackupOperation {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchOperation for BackupOperation {
    fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    fn process_item<'a>(
        &'a self,
        item_id: &'a str,
        ctx: &'a ItemContext,
    ) -> BoxFuture<'a, Result<serde_json::Value>> {
        Box::pin(async move {
            ensure_not_cancelled(ctx)?;
            let source = Path::new(item_id);
            let target = backup_path(source);
            let bytes = tokio::fs::copy(source, &target).await.with_context(|| {
                format!("Failed to copy {} to {}", source.display(), target.display())
            })?;
            tracing::debug!(file = %item_id, backup = %target.display(), bytes, "Backed up");

            Ok(json!({ "backup": target.display().to_string(), "bytes": bytes }))
        })
    }
}

// --- remove-backup ---

/// Deletes the `.bak` copy of each file. Destructive, so it asks first.
#[derive(Debug)]
pub struct RemoveBackupOperation {
    descriptor: OperationDescriptor,
}

impl RemoveBackupOperation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: OperationDescriptor::new("remove-backup", "Remove backups")
                .with_confirmation(true),
        }
    }
}

impl Default for RemoveBackupOperation {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchOperation for RemoveBackupOperation {
    fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    fn process_item<'a>(
        &'a self,
        item_id: &'a str,
        ctx: &'a ItemContext,
    ) -> BoxFuture<'a, Result<serde_json::Value>> {
        Box::pin(async move {
            ensure_not_cancelled(ctx)?;
            let target = backup_path(Path::new(item_id));
            tokio::fs::remove_file(&target)
                .await
                .with_context(|| format!("Failed to remove {}", target.display()))?;

            Ok(json!({ "removed": target.display().to_string() }))
        })
    }
}

// --- export ---

/// Copies each file to its output location.
#[derive(Debug)]
pub struct ExportOperation {
    descriptor: OperationDescriptor,
    output: OutputSettings,
    source_root: Option<PathBuf>,
}

impl ExportOperation {
    #[must_use]
    pub fn new(output: OutputSettings) -> Self {
        Self {
            descriptor: OperationDescriptor::new("export", "Export to output"),
            output,
            source_root: None,
        }
    }

    /// Sets the folder item paths are made relative to inside the output
    /// folder. Items outside it keep only their file name.
    #[must_use]
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = Some(root.into());
        self
    }

    /// Returns where `source` is exported to, or `None` if it has no file
    /// name.
    #[must_use]
    pub fn target_path(&self, source: &Path) -> Option<PathBuf> {
        let file_name = source.file_name()?;

        let Some(dir) = &self.output.dir else {
            let mut name = source.file_stem().unwrap_or(file_name).to_owned();
            name.push(&self.output.suffix);
            if let Some(ext) = source.extension() {
                name.push(".");
                name.push(ext);
            }
            return Some(source.with_file_name(name));
        };

        let relative = self
            .source_root
            .as_deref()
            .and_then(|root| source.strip_prefix(root).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from(file_name), Path::to_path_buf);
        Some(dir.join(relative))
    }
}

impl Default for ExportOperation {
    fn default() -> Self {
        Self::new(OutputSettings::default())
    }
}

impl BatchOperation for ExportOperation {
    fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    fn process_item<'a>(
        &'a self,
        item_id: &'a str,
        ctx: &'a ItemContext,
    ) -> BoxFuture<'a, Result<serde_json::Value>> {
        Box::pin(async move {
            ensure_not_cancelled(ctx)?;
            let source = Path::new(item_id);
            let target = self
                .target_path(source)
                .with_context(|| format!("no output path for {item_id}"))?;
            if same_file(source, &target).await {
                anyhow::bail!("refusing to export {item_id} onto itself");
            }

            if let Some(parent) = target.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let bytes = tokio::fs::copy(source, &target).await.with_context(|| {
                format!("Failed to copy {} to {}", source.display(), target.display())
            })?;
            tracing::debug!(file = %item_id, output = %target.display(), bytes, "Exported");

            Ok(json!({ "output": target.display().to_string(), "bytes": bytes }))
        })
    }
}

#[cfg(test)]
mod tests;
