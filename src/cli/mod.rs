// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for batchloc using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! batchloc [global options] <command>
//! version | options | inis
//! list [--json]
//! scan DIR [--json]
//! run OPERATION [ITEMS...] [--scan DIR] [--select GLOB]... [--yes]
//! ```

pub mod global;
pub mod run;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use crate::cli::run::{ListArgs, RunArgs, ScanArgs};
use clap::{Parser, Subcommand};

/// Batch operations over selected game localization files.
#[derive(Debug, Parser)]
#[command(
    name = "batchloc",
    author,
    version,
    about = "Batch operations for game localization files",
    long_about = "batchloc Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Runs one operation over a selection of localization files with\n\
                  bounded concurrency, retries and progress reporting.\n\n\
                  `batchloc run validate --scan game/lang` validates every\n\
                  translatable file below game/lang. See\n\
                  `batchloc <command> --help` for more information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  By default, batchloc loads `batchloc.toml` from the current\n\
                  directory if it exists. Additional files can be given with --ini,\n\
                  those are loaded after it. BATCHLOC_* environment variables and\n\
                  --set come last. Use --no-default-inis to only use --ini."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the config files used by batchloc.
    Inis,

    /// Lists available operations.
    List(ListArgs),

    /// Lists translatable files below a folder.
    Scan(ScanArgs),

    /// Runs an operation over selected items.
    Run(RunArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
