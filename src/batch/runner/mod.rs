// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Batch runner: one operation over a snapshot of item ids.
//!
//! ```text
//! run(op, items, confirmed)
//!   reject: already running | unconfirmed | bad descriptor | concurrency 0
//!   reporter.start_operation(CAN_CANCEL)
//!   stream::iter(items).map(process).buffer_unordered(concurrency)
//!       per item: cancelled? --> wait while paused --> attempt 1..=retries+1
//!                 attempt = process_item under optional timeout
//!       per outcome: slot[index], hook, progress tick
//!   reporter.complete_operation | cancel_operation
//!   BatchResult (input order, counts always add up)
//! ```
//!
//! All items are polled on the calling task, so outcome slots and counters
//! are written without locks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures_util::{StreamExt, stream};
use serde_json::{Value, json};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{BatchOperationConfig, BatchResult, BatchStatus, ItemOutcome};
use crate::error::{BatchError, BatchlocResult, ItemError};
use crate::operation::registry::OperationRegistry;
use crate::operation::{BatchOperation, ItemContext, OperationDescriptor};
use crate::progress::{ProgressFlags, ProgressOptions, ProgressReporter};

#[derive(Debug, Default)]
struct RunState {
    status: BatchStatus,
    /// Operation of the current or last run.
    operation: Option<String>,
}

/// Executes batch operations with bounded concurrency.
///
/// A runner executes one batch at a time. Its cancellation token is shared
/// by every run; once cancelled, later runs resolve with every item
/// cancelled.
pub struct BatchRunner {
    config: BatchOperationConfig,
    reporter: Option<Arc<ProgressReporter>>,
    cancel_token: CancellationToken,
    pause_tx: watch::Sender<bool>,
    state: Mutex<RunState>,
}

impl BatchRunner {
    /// Creates an idle runner.
    #[must_use]
    pub fn new(config: BatchOperationConfig) -> Self {
        let (pause_tx, _) = watch::channel(false);
        Self {
            config,
            reporter: None,
            cancel_token: CancellationToken::new(),
            pause_tx,
            state: Mutex::new(RunState::default()),
        }
    }

    /// Reports progress of every run to `reporter`.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<ProgressReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Uses an externally owned cancellation token.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Returns the execution settings.
    #[must_use]
    pub const fn config(&self) -> &BatchOperationConfig {
        &self.config
    }

    /// Returns the cancellation token for sharing with the host.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Stops dispatching new items. In-flight items run to completion.
    pub fn cancel(&self) {
        info!("Cancelling batch");
        self.cancel_token.cancel();
    }

    /// Holds back items that have not started yet.
    ///
    /// Returns `true` if a running batch moved to `Paused`.
    pub fn pause(&self) -> bool {
        self.pause_tx.send_replace(true);
        let mut state = self.lock_state();
        if state.status == BatchStatus::Running {
            state.status = BatchStatus::Paused;
            info!(operation = ?state.operation, "Batch paused");
            true
        } else {
            false
        }
    }

    /// Releases items held back by [`BatchRunner::pause`].
    ///
    /// Returns `true` if a paused batch moved back to `Running`.
    pub fn resume(&self) -> bool {
        self.pause_tx.send_replace(false);
        let mut state = self.lock_state();
        if state.status == BatchStatus::Paused {
            state.status = BatchStatus::Running;
            info!(operation = ?state.operation, "Batch resumed");
            true
        } else {
            false
        }
    }

    /// Returns the current status, or the terminal status of the last run.
    #[must_use]
    pub fn status(&self) -> BatchStatus {
        self.lock_state().status
    }

    fn lock_state(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, status: BatchStatus) {
        self.lock_state().status = status;
    }

    /// Looks up `operation_id` in `registry` and runs it.
    ///
    /// # Errors
    ///
    /// `BatchError::OperationNotFound` for an unknown id, otherwise as
    /// [`BatchRunner::run`].
    pub async fn run_registered(
        &self,
        registry: &OperationRegistry,
        operation_id: &str,
        item_ids: Vec<String>,
        confirmed: bool,
    ) -> BatchlocResult<BatchResult> {
        match registry.get(operation_id) {
            Ok(operation) => self.run(operation.as_ref(), item_ids, confirmed).await,
            Err(e) => {
                let mut state = self.lock_state();
                if !state.status.is_active() {
                    state.status = BatchStatus::FailedToStart;
                    state.operation = Some(operation_id.to_string());
                }
                Err(e)
            }
        }
    }

    /// Runs `operation` over `item_ids`.
    ///
    /// The result always holds exactly one outcome per input id, in input
    /// order. Item failures, timeouts and cancellation are recorded in the
    /// result rather than returned as errors.
    ///
    /// # Errors
    ///
    /// Only when the batch cannot start:
    /// - `BatchError::AlreadyRunning` if this runner is busy (status untouched)
    /// - `BatchError::ConfirmationRequired` if the operation needs confirmation
    ///   and `confirmed` is false
    /// - `BatchError::InvalidDescriptor` for an empty id or name
    /// - `BatchError::InvalidConfig` for a concurrency of zero
    pub async fn run(
        &self,
        operation: &dyn BatchOperation,
        item_ids: Vec<String>,
        confirmed: bool,
    ) -> BatchlocResult<BatchResult> {
        let descriptor = operation.descriptor();
        let operation_id = descriptor.id().to_string();

        {
            let mut state = self.lock_state();
            if state.status.is_active() {
                let busy = state.operation.clone().unwrap_or_default();
                warn!(operation = %operation_id, running = %busy, "Runner is busy");
                return Err(BatchError::AlreadyRunning(busy).into());
            }

            state.operation = Some(operation_id.clone());
            if let Err(e) = self.check_startable(descriptor, confirmed) {
                warn!(operation = %operation_id, error = %e, "Batch failed to start");
                state.status = BatchStatus::FailedToStart;
                return Err(e.into());
            }

            state.status = if *self.pause_tx.borrow() {
                BatchStatus::Paused
            } else {
                BatchStatus::Running
            };
        }

        let total = item_ids.len();
        info!(
            operation = %operation_id,
            total,
            concurrency = self.config.concurrency(),
            "Starting batch"
        );

        if let Some(reporter) = &self.reporter {
            reporter.start_operation(
                &operation_id,
                ProgressOptions::builder()
                    .with_title(descriptor.name())
                    .with_description(format!("{total} items"))
                    .with_flags(ProgressFlags::CAN_CANCEL)
                    .with_cancel_token(self.cancel_token.clone())
                    .build(),
            );
        }

        let started = Instant::now();
        let mut slots: Vec<Option<ItemOutcome>> = vec![None; total];
        {
            let mut outcomes = stream::iter(item_ids.iter().enumerate())
                .map(|(index, item_id)| async move {
                    (index, self.process_item(operation, item_id).await)
                })
                .buffer_unordered(self.config.concurrency());

            let mut completed = 0usize;
            while let Some((index, outcome)) = outcomes.next().await {
                completed += 1;
                if !outcome.is_cancelled() {
                    self.config.notify(&outcome);
                }
                self.report_tick(&operation_id, completed, total);
                slots[index] = Some(outcome);
            }
        }

        let results: Vec<ItemOutcome> = slots
            .into_iter()
            .zip(item_ids)
            .map(|(slot, item_id)| slot.unwrap_or_else(|| ItemOutcome::cancelled(item_id)))
            .collect();

        let status = if self.cancel_token.is_cancelled() {
            BatchStatus::Cancelled
        } else {
            BatchStatus::Completed
        };
        let result = BatchResult::from_outcomes(&operation_id, results, started.elapsed(), status);

        if let Some(reporter) = &self.reporter {
            if status == BatchStatus::Cancelled {
                reporter.cancel_operation(&operation_id);
            } else {
                reporter.complete_operation(&operation_id, Some(summary_json(&result)));
            }
        }
        self.set_status(status);

        info!(
            operation = %operation_id,
            total = result.total_items,
            succeeded = result.success_count,
            failed = result.failure_count,
            cancelled = result.cancelled_count,
            duration_ms = result.duration_ms,
            "Batch finished"
        );

        Ok(result)
    }

    fn check_startable(
        &self,
        descriptor: &OperationDescriptor,
        confirmed: bool,
    ) -> Result<(), BatchError> {
        if descriptor.id().trim().is_empty() || descriptor.name().trim().is_empty() {
            return Err(BatchError::InvalidDescriptor(format!(
                "operation '{}' needs a non-empty id and name",
                descriptor.id()
            )));
        }
        if descriptor.requires_confirmation() && !confirmed {
            return Err(BatchError::ConfirmationRequired(descriptor.id().to_string()));
        }
        if self.config.concurrency() == 0 {
            return Err(BatchError::InvalidConfig {
                operation: descriptor.id().to_string(),
                message: "concurrency must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn report_tick(&self, operation_id: &str, completed: usize, total: usize) {
        let Some(reporter) = &self.reporter else {
            return;
        };
        let percent = u8::try_from(completed * 100 / total.max(1)).unwrap_or(100);
        reporter.update_progress(
            operation_id,
            percent,
            Some(format!("{completed}/{total} items")),
        );
    }

    async fn process_item(&self, operation: &dyn BatchOperation, item_id: &str) -> ItemOutcome {
        if self.cancel_token.is_cancelled() || !self.wait_while_paused().await {
            debug!(item = %item_id, "Item cancelled before dispatch");
            return ItemOutcome::cancelled(item_id);
        }

        let max_attempts = self.config.retry_attempts().saturating_add(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let ctx = ItemContext::new(self.cancel_token.clone(), attempt);
            let error = match self.attempt(operation, item_id, &ctx).await {
                Ok(value) => {
                    debug!(item = %item_id, attempt, "Item succeeded");
                    return ItemOutcome::succeeded(item_id, value, attempt);
                }
                Err(e) => e,
            };

            if attempt >= max_attempts {
                warn!(item = %item_id, attempt, error = %error, "Item failed");
                return ItemOutcome::failed(item_id, &error, attempt);
            }

            debug!(item = %item_id, attempt, error = %error, "Retrying item");
            let cancelled = tokio::select! {
                biased;
                () = self.cancel_token.cancelled() => true,
                () = tokio::time::sleep(self.config.retry_delay()) => false,
            };
            if cancelled {
                // The item did run, so its last error stands.
                debug!(item = %item_id, attempt, "Retry abandoned on cancellation");
                return ItemOutcome::failed(item_id, &error, attempt);
            }
        }
    }

    async fn attempt(
        &self,
        operation: &dyn BatchOperation,
        item_id: &str,
        ctx: &ItemContext,
    ) -> Result<Value, ItemError> {
        let work = operation.process_item(item_id, ctx);
        let result = match self.config.item_timeout() {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .map_err(|_| ItemError::Timeout {
                    timeout_ms: duration_ms(limit),
                })?,
            None => work.await,
        };
        result.map_err(|e| ItemError::Failed(format!("{e:#}")))
    }

    /// Waits until the runner is not paused. Returns `false` if cancelled
    /// while waiting.
    async fn wait_while_paused(&self) -> bool {
        let mut paused = self.pause_tx.subscribe();
        tokio::select! {
            biased;
            () = self.cancel_token.cancelled() => false,
            resumed = paused.wait_for(|value| !*value) => resumed.is_ok(),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn summary_json(result: &BatchResult) -> Value {
    json!({
        "totalItems": result.total_items,
        "successCount": result.success_count,
        "failureCount": result.failure_count,
        "durationMs": result.duration_ms,
    })
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("config", &self.config)
            .field("status", &self.status())
            .field("cancelled", &self.cancel_token.is_cancelled())
            .finish_non_exhaustive()
    }
}
