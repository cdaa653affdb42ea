// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for `run`, `list` and `scan`.
//!
//! ```text
//! run OPERATION [ITEMS...]
//!   items:     ITEMS and/or --scan DIR (files found below DIR)
//!   selection: every item, or only --select GLOB matches
//!   overrides: --concurrency, --retries, --timeout-ms beat the config
//!   export:    --output DIR, paths kept relative to --scan DIR
//! ```

use std::path::PathBuf;

use clap::Args;

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Operation id, see `batchloc list`.
    #[arg(value_name = "OPERATION")]
    pub operation: String,

    /// Item ids (file paths for the built-in operations).
    #[arg(value_name = "ITEM")]
    pub items: Vec<String>,

    /// Adds every translatable file below DIR to the available items.
    #[arg(long, value_name = "DIR")]
    pub scan: Option<PathBuf>,

    /// Only selects available items matching GLOB. Can be repeated.
    #[arg(long = "select", value_name = "GLOB", action = clap::ArgAction::Append)]
    pub select: Vec<String>,

    /// Confirms operations that require it without prompting.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Maximum number of items processed at once.
    #[arg(short = 'j', long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Extra attempts for failed items.
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Per-item timeout in milliseconds, 0 disables it.
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Prints the batch result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Disables the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Output folder for `export`, overrides `output.dir`.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Prints operation descriptors as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `scan` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ScanArgs {
    /// Folder to scan.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Prints the scan summary as JSON.
    #[arg(long)]
    pub json: bool,
}
