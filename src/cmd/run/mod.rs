// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Run command implementation for batchloc.
//!
//! ```text
//! registry.get(OPERATION)
//!   --> SelectionScope::mount
//!         available = ITEMS + scan(--scan DIR)
//!         select_all | select_matching(--select)...
//!         snapshot
//!   --> confirm (--yes or prompt) if required
//!   --> BatchRunner (config + CLI overrides, Ctrl+C cancels)
//!         ProgressReporter --> EventBus --> ConsoleProgress
//!   --> summary / JSON, error if any item failed
//! ```

use std::io::{BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::Context;

use crate::batch::{BatchOperationConfig, BatchResult, BatchRunner};
use crate::cli::run::RunArgs;
use crate::config::Config;
use crate::config::types::{BatchSettings, ScanSettings};
use crate::error::Result;
use crate::operation::OperationDescriptor;
use crate::operation::builtin::{self, ExportOperation, scan::scan_translatable_files};
use crate::progress::{ConsoleProgress, EventBus, ProgressDisplay, ProgressReporter};
use crate::selection::SelectionScope;

/// Main handler for run command.
///
/// # Errors
///
/// Returns an error if the operation is unknown, the items cannot be
/// collected, the batch cannot start, or any item failed.
pub async fn run_batch_command(args: &RunArgs, config: &Config) -> Result<()> {
    let registry = builtin::registry_with_export(export_operation(config, args))?;
    let operation = registry.get(&args.operation)?;
    let descriptor = operation.descriptor().clone();

    let mut scope = SelectionScope::new();
    scope.mount();
    let items = select_items(&mut scope, args, &config.scan)?;
    if items.is_empty() {
        println!("No items selected");
        return Ok(());
    }

    let confirmed = args.yes
        || (descriptor.requires_confirmation()
            && prompt_confirmation(&descriptor, items.len()).await?);

    let settings = effective_settings(config, args);
    settings.validate("batch")?;
    tracing::debug!(operation = %descriptor.id(), ?settings, "Effective batch settings");

    let bus = Arc::new(EventBus::new());
    let reporter = Arc::new(ProgressReporter::new(Arc::clone(&bus)));
    let display = if args.no_progress || args.json {
        ProgressDisplay::Silent
    } else {
        ProgressDisplay::Bar
    };
    let console = ConsoleProgress::attach(Arc::clone(&bus), descriptor.id(), display);

    let runner =
        BatchRunner::new(BatchOperationConfig::from_settings(&settings)).with_reporter(reporter);

    let cancel_token = runner.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, finishing in-flight items...");
            cancel_token.cancel();
        }
    });

    let result = runner.run(operation.as_ref(), items, confirmed).await;
    interrupt.abort();
    drop(console);
    scope.unmount();
    let result = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in format_result(&result) {
            println!("{line}");
        }
    }

    if !result.all_succeeded() {
        anyhow::bail!(
            "{} of {} items failed",
            result.failure_count,
            result.total_items
        );
    }
    Ok(())
}

/// Builds `export` from `[output]`, `--output` and the `--scan` root.
#[must_use]
pub fn export_operation(config: &Config, args: &RunArgs) -> ExportOperation {
    let mut output = config.output.clone();
    if let Some(dir) = &args.output {
        output.dir = Some(dir.clone());
    }
    let export = ExportOperation::new(output);
    match &args.scan {
        Some(root) => export.with_source_root(root),
        None => export,
    }
}

/// Fills the mounted store and returns the snapshot handed to the runner.
///
/// Available items are the positional items followed by the scanned files.
/// With no `--select` every item is selected.
///
/// # Errors
///
/// Returns an error if the scope is not mounted, the scan fails, or a glob
/// is invalid.
pub fn select_items(
    scope: &mut SelectionScope,
    args: &RunArgs,
    scan: &ScanSettings,
) -> Result<Vec<String>> {
    let mut available = args.items.clone();
    if let Some(dir) = &args.scan {
        let files = scan_translatable_files(dir, scan)
            .with_context(|| format!("Failed to scan {}", dir.display()))?;
        available.extend(
            files
                .into_iter()
                .map(|p| p.display().to_string())
                .filter(|p| !args.items.contains(p)),
        );
    }

    let store = scope.store_mut()?;
    store.set_available_items(available);

    if args.select.is_empty() {
        store.select_all();
    } else {
        for pattern in &args.select {
            let added = store.select_matching(pattern)?;
            tracing::debug!(pattern = %pattern, added, "Applied selection glob");
        }
    }

    tracing::info!(
        available = store.available_items().len(),
        selected = store.selected_count(),
        "Selection ready"
    );
    Ok(store.snapshot())
}

/// Batch settings for the operation with CLI flags applied on top.
#[must_use]
pub fn effective_settings(config: &Config, args: &RunArgs) -> BatchSettings {
    let mut settings = config.batch_settings(&args.operation);
    if let Some(concurrency) = args.concurrency {
        settings.concurrency = usize::from(concurrency);
    }
    if let Some(retries) = args.retries {
        settings.retry_attempts = retries;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        settings.item_timeout_ms = timeout_ms;
    }
    settings
}

/// Human-readable summary: one line for the batch, one per failed item.
#[must_use]
pub fn format_result(result: &BatchResult) -> Vec<String> {
    let mut lines = vec![result.summary()];
    lines.extend(result.failures().filter(|r| !r.is_cancelled()).map(|r| {
        format!(
            "  {}: {}",
            r.item_id,
            r.error.as_deref().unwrap_or("unknown error")
        )
    }));
    lines
}

/// Asks on the terminal whether to run a destructive operation.
///
/// Answers `false` without asking when stdin is not a terminal.
async fn prompt_confirmation(descriptor: &OperationDescriptor, count: usize) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        tracing::warn!(
            operation = %descriptor.id(),
            "Confirmation required but stdin is not a terminal, pass --yes"
        );
        return Ok(false);
    }

    let question = format!("{} {} item(s)? [y/N] ", descriptor.name(), count);
    tokio::task::spawn_blocking(move || -> Result<bool> {
        let mut stderr = std::io::stderr();
        stderr.write_all(question.as_bytes())?;
        stderr.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    })
    .await
    .context("Confirmation prompt failed")?
}

/// Returns whether a prompt answer means yes.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
