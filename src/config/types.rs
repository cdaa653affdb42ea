// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for batchloc.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, BatchSettings, ScanSettings, OutputSettings
//! operations: operation id or glob -> OperationOverride
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Default number of items processed at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default delay between retries of a failed item.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Suffix of exported files written next to their source.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_translated";

/// Files above this size are skipped by the scanner (50 MiB).
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stderr output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Execution settings shared by every batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchSettings {
    /// Maximum number of items in flight.
    pub concurrency: usize,
    /// Extra attempts after the first failure of an item.
    pub retry_attempts: u32,
    /// Delay between attempts, in milliseconds.
    pub retry_delay_ms: u64,
    /// Per-item timeout in milliseconds, 0 disables it.
    pub item_timeout_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            retry_attempts: 0,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            item_timeout_ms: 0,
        }
    }
}

impl BatchSettings {
    /// Checks that the settings can drive a run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `concurrency` is zero.
    pub fn validate(&self, section: &str) -> std::result::Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                section: section.to_string(),
                key: "concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Filters applied when scanning a folder for translatable files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSettings {
    /// Lowercase extensions (without dot) to include.
    pub include_extensions: Vec<String>,
    /// Directory names never descended into.
    pub exclude_dirs: Vec<String>,
    /// Maximum walk depth below the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Skip dot-files and dot-directories.
    pub skip_hidden: bool,
    /// Skip files larger than this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size_bytes: Option<u64>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        let to_strings = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        Self {
            include_extensions: to_strings(&[
                "json",
                "po",
                "pot",
                "resx",
                "csv",
                "txt",
                "srt",
                "vtt",
                "ass",
                "ssa",
                "xml",
                "yaml",
                "yml",
                "properties",
                "ini",
                "cfg",
            ]),
            exclude_dirs: to_strings(&[
                "node_modules",
                ".git",
                "target",
                "__pycache__",
                ".venv",
                "dist",
                "build",
            ]),
            max_depth: Some(10),
            skip_hidden: true,
            max_size_bytes: Some(DEFAULT_MAX_SIZE_BYTES),
        }
    }
}

/// Where the `export` operation writes its copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Output folder. Files keep their path relative to the scanned root.
    /// Without it, copies land next to the source as `<stem><suffix>.<ext>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Appended to the file stem when no output folder is set.
    pub suffix: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: None,
            suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}
