// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-operation batch settings merging.
//!
//! ```text
//! BatchSettings + OperationOverride --> field-by-field merge
//! ```
//!
//! Only explicitly set fields (`Some`) in override replace base values.

use serde::{Deserialize, Serialize};

use super::types::BatchSettings;

/// Batch settings with optional fields for field-level merging.
///
/// Used for `[operations.<id>]` sections where only explicitly set fields
/// should override `[batch]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperationOverride {
    /// Maximum number of items in flight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    /// Extra attempts after the first failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_attempts: Option<u32>,
    /// Delay between attempts, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
    /// Per-item timeout in milliseconds, 0 disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_timeout_ms: Option<u64>,
}

/// Applies `over` on top of `base`.
#[must_use]
pub fn merge_batch_settings(base: &BatchSettings, over: &OperationOverride) -> BatchSettings {
    BatchSettings {
        concurrency: over.concurrency.unwrap_or(base.concurrency),
        retry_attempts: over.retry_attempts.unwrap_or(base.retry_attempts),
        retry_delay_ms: over.retry_delay_ms.unwrap_or(base.retry_delay_ms),
        item_timeout_ms: over.item_timeout_ms.unwrap_or(base.item_timeout_ms),
    }
}
