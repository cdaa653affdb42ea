// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Config --> Command Dispatch
//!   Version | Options | Inis | List | Scan | Run
//! ```

use std::process::ExitCode;

use batchloc::cli::global::GlobalOptions;
use batchloc::cli::{self, Command};
use batchloc::cmd::config::{run_inis_command, run_options_command};
use batchloc::cmd::list::run_list_command;
use batchloc::cmd::run::run_batch_command;
use batchloc::cmd::scan::run_scan_command;
use batchloc::config::Config;
use batchloc::config::loader::ConfigLoader;
use batchloc::logging::init_logging;
use batchloc::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Config file picked up from the working directory.
const DEFAULT_CONFIG_FILE: &str = "batchloc.toml";

/// Prefix of environment variable overrides.
const ENV_PREFIX: &str = "BATCHLOC";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .with_json_file(global.log_json)
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            load_config(&cli.global).map(|config| run_options_command(&config))
        }
        Some(Command::Inis) => {
            let loader = build_config_loader(&cli.global);
            run_inis_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(Command::List(args)) => run_list_command(args),
        Some(Command::Scan(args)) => {
            load_config(&cli.global).and_then(|config| run_scan_command(args, &config))
        }
        Some(Command::Run(args)) => match load_config(&cli.global) {
            Ok(config) => run_batch_command(args, &config).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_inis {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(global: &GlobalOptions) -> batchloc::error::Result<Config> {
    build_config_loader(global)
        .apply_overrides(&global.to_config_overrides())
        .and_then(ConfigLoader::build)
        .map_err(|e| {
            eprintln!("Failed to load config: {e}");
            e
        })
}
