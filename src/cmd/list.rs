// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! List command implementation for batchloc.

use crate::cli::run::ListArgs;
use crate::error::Result;
use crate::operation::OperationDescriptor;
use crate::operation::builtin;

/// Main handler for list command.
///
/// # Errors
///
/// Returns an error if the registry cannot be built or JSON output fails.
pub fn run_list_command(args: &ListArgs) -> Result<()> {
    let registry = builtin::registry()?;
    let descriptors: Vec<&OperationDescriptor> = registry.descriptors().collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }

    for line in format_operations(&descriptors) {
        println!("{line}");
    }
    Ok(())
}

/// Formats one line per operation: id, name and a confirmation marker.
#[must_use]
pub fn format_operations(descriptors: &[&OperationDescriptor]) -> Vec<String> {
    let width = descriptors.iter().map(|d| d.id().len()).max().unwrap_or(0);
    descriptors
        .iter()
        .map(|d| {
            let marker = if d.requires_confirmation() {
                "  (requires confirmation)"
            } else {
                ""
            };
            format!("{:<width$}  {}{marker}", d.id(), d.name())
        })
        .collect()
}
