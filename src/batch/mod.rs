// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Batch execution types.
//!
//! ```text
//! BatchRunner::run(op, items, confirmed)
//!     |
//!     v
//! BatchResult
//!   results[i].item_id == items[i]          input order kept
//!   success_count + failure_count == total  always
//!   cancelled_count <= failure_count
//! ```

pub mod runner;

use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::config::types::{BatchSettings, DEFAULT_CONCURRENCY, DEFAULT_RETRY_DELAY_MS};
use crate::error::ItemError;

pub use runner::BatchRunner;

/// Outcome of one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    pub item_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Attempts made, 0 when the item never started.
    pub attempts: u32,
    /// Set when the run was cancelled before the item was dispatched.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

impl ItemOutcome {
    #[must_use]
    pub fn succeeded(item_id: impl Into<String>, result: Value, attempts: u32) -> Self {
        Self {
            item_id: item_id.into(),
            success: true,
            result: (!result.is_null()).then_some(result),
            error: None,
            attempts,
            cancelled: false,
        }
    }

    #[must_use]
    pub fn failed(item_id: impl Into<String>, error: &ItemError, attempts: u32) -> Self {
        Self {
            item_id: item_id.into(),
            success: false,
            result: None,
            error: Some(error.to_string()),
            attempts,
            cancelled: matches!(error, ItemError::Cancelled),
        }
    }

    /// Outcome of an item that was never dispatched.
    #[must_use]
    pub fn cancelled(item_id: impl Into<String>) -> Self {
        Self::failed(item_id, &ItemError::Cancelled, 0)
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Status of a runner, and the terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
    FailedToStart,
    Cancelled,
}

impl BatchStatus {
    /// Returns whether a run is in flight.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// Aggregate result of one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub operation_id: String,
    pub total_items: usize,
    pub success_count: usize,
    pub failure_count: usize,
    /// Items never dispatched, counted in `failure_count` too.
    pub cancelled_count: usize,
    pub results: Vec<ItemOutcome>,
    /// Wall-clock time of the whole run.
    pub duration_ms: u64,
    pub completed_at: DateTime<Utc>,
    pub status: BatchStatus,
}

impl BatchResult {
    /// Aggregates ordered outcomes.
    #[must_use]
    pub fn from_outcomes(
        operation_id: impl Into<String>,
        results: Vec<ItemOutcome>,
        duration: Duration,
        status: BatchStatus,
    ) -> Self {
        let success_count = results.iter().filter(|r| r.success).count();
        let cancelled_count = results.iter().filter(|r| r.is_cancelled()).count();
        Self {
            operation_id: operation_id.into(),
            total_items: results.len(),
            success_count,
            failure_count: results.len() - success_count,
            cancelled_count,
            results,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            completed_at: Utc::now(),
            status,
        }
    }

    /// Returns the outcomes that failed, cancelled ones included.
    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.results.iter().filter(|r| !r.success)
    }

    /// Returns whether every item succeeded.
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.failure_count == 0
    }

    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{}: {} of {} succeeded, {} failed",
            self.operation_id, self.success_count, self.total_items, self.failure_count
        );
        if self.cancelled_count > 0 {
            line.push_str(&format!(" ({} cancelled)", self.cancelled_count));
        }
        line.push_str(&format!(" in {} ms", self.duration_ms));
        line
    }
}

/// Hook called with the outcome of a finished item.
pub type ItemHook = Arc<dyn Fn(&ItemOutcome) + Send + Sync>;

/// Execution settings for one runner.
#[derive(Clone, Builder)]
pub struct BatchOperationConfig {
    /// Maximum number of items in flight.
    #[builder(setters(name = with_concurrency), default = DEFAULT_CONCURRENCY)]
    concurrency: usize,
    /// Extra attempts after the first failure.
    #[builder(setters(name = with_retry_attempts), default = 0)]
    retry_attempts: u32,
    #[builder(setters(name = with_retry_delay), default = Duration::from_millis(DEFAULT_RETRY_DELAY_MS))]
    retry_delay: Duration,
    #[builder(setters(name = with_item_timeout))]
    item_timeout: Option<Duration>,
    /// Called for every item that succeeded.
    #[builder(setters(name = with_on_item_complete))]
    on_item_complete: Option<ItemHook>,
    /// Called for every item that failed after its last attempt.
    #[builder(setters(name = with_on_item_error))]
    on_item_error: Option<ItemHook>,
}

impl Default for BatchOperationConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BatchOperationConfig {
    /// Builds a config from file settings, without hooks.
    #[must_use]
    pub fn from_settings(settings: &BatchSettings) -> Self {
        Self::builder()
            .with_concurrency(settings.concurrency)
            .with_retry_attempts(settings.retry_attempts)
            .with_retry_delay(Duration::from_millis(settings.retry_delay_ms))
            .maybe_with_item_timeout(
                (settings.item_timeout_ms > 0)
                    .then(|| Duration::from_millis(settings.item_timeout_ms)),
            )
            .build()
    }

    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub const fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    #[must_use]
    pub const fn item_timeout(&self) -> Option<Duration> {
        self.item_timeout
    }

    pub(crate) fn notify(&self, outcome: &ItemOutcome) {
        let hook = if outcome.success {
            &self.on_item_complete
        } else {
            &self.on_item_error
        };
        if let Some(hook) = hook {
            hook(outcome);
        }
    }
}

impl std::fmt::Debug for BatchOperationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOperationConfig")
            .field("concurrency", &self.concurrency)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("item_timeout", &self.item_timeout)
            .field("on_item_complete", &self.on_item_complete.is_some())
            .field("on_item_error", &self.on_item_error.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests;
