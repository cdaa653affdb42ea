// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for batchloc.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. batchloc.toml (cwd)
//! 3. --ini FILE (repeatable)
//! 4. BATCHLOC_* env vars
//! 5. --set section/key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! BATCHLOC_BATCH__CONCURRENCY=8      → batch.concurrency = 8
//! BATCHLOC_SCAN__SKIP_HIDDEN=false   → scan.skip_hidden = false
//! ```
//!
//! # Operation-Specific Overrides
//!
//! ```toml
//! [batch]
//! concurrency = 4
//!
//! [operations.backup]
//! concurrency = 1   # override for backup only
//!
//! [operations."*-backup"]
//! retry_attempts = 2
//! ```

pub mod loader;
pub mod merge;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use wax::Program as _;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use merge::OperationOverride;
use types::{BatchSettings, GlobalConfig, OutputSettings, ScanSettings};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Default batch execution settings.
    pub batch: BatchSettings,
    /// Translatable file discovery.
    pub scan: ScanSettings,
    /// Export destination.
    pub output: OutputSettings,
    /// Per-operation overrides keyed by id or glob.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub operations: BTreeMap<String, OperationOverride>,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use batchloc::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("config/default.toml")
    ///     .add_toml_file_optional("batchloc.toml")
    ///     .with_env_prefix("BATCHLOC")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Effective batch settings for an operation.
    ///
    /// Resolution order:
    /// 1. Exact match on operation id (e.g., `[operations.backup]`)
    /// 2. First glob pattern match in key order (e.g., `[operations."*-backup"]`)
    /// 3. Default `[batch]` settings
    #[must_use]
    pub fn batch_settings(&self, operation_id: &str) -> BatchSettings {
        if let Some(over) = self.operations.get(operation_id) {
            return merge::merge_batch_settings(&self.batch, over);
        }

        for (pattern, over) in &self.operations {
            if let Ok(glob) = wax::Glob::new(pattern)
                && glob.is_match(operation_id)
            {
                return merge::merge_batch_settings(&self.batch, over);
            }
        }

        self.batch.clone()
    }

    /// Validates every section that can be invalid after deserialization.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero concurrency in `[batch]`
    /// or any `[operations.*]` override.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.batch.validate("batch")?;
        for (name, over) in &self.operations {
            merge::merge_batch_settings(&self.batch, over)
                .validate(&format!("operations.{name}"))?;
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert(
            "global.output_log_level".to_string(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".to_string(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".to_string(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );

        Self::format_batch_settings(&mut options, "batch", &self.batch);
        for name in self.operations.keys() {
            let settings = self.batch_settings(name);
            Self::format_batch_settings(&mut options, &format!("operations.{name}"), &settings);
        }

        options.insert(
            "scan.include_extensions".to_string(),
            self.scan.include_extensions.join(", "),
        );
        options.insert(
            "scan.exclude_dirs".to_string(),
            self.scan.exclude_dirs.join(", "),
        );
        options.insert(
            "scan.max_depth".to_string(),
            self.scan
                .max_depth
                .map_or_else(|| "unlimited".to_string(), |d| d.to_string()),
        );
        options.insert(
            "scan.skip_hidden".to_string(),
            self.scan.skip_hidden.to_string(),
        );
        options.insert(
            "scan.max_size_bytes".to_string(),
            self.scan
                .max_size_bytes
                .map_or_else(|| "unlimited".to_string(), |b| b.to_string()),
        );

        options.insert(
            "output.dir".to_string(),
            self.output
                .dir
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("output.suffix".to_string(), self.output.suffix.clone());

        options
            .into_iter()
            .map(|(key, value)| format!("{key} = {value}"))
            .collect()
    }

    fn format_batch_settings(
        options: &mut BTreeMap<String, String>,
        section: &str,
        settings: &BatchSettings,
    ) {
        options.insert(
            format!("{section}.concurrency"),
            settings.concurrency.to_string(),
        );
        options.insert(
            format!("{section}.retry_attempts"),
            settings.retry_attempts.to_string(),
        );
        options.insert(
            format!("{section}.retry_delay_ms"),
            settings.retry_delay_ms.to_string(),
        );
        options.insert(
            format!("{section}.item_timeout_ms"),
            settings.item_timeout_ms.to_string(),
        );
    }
}
