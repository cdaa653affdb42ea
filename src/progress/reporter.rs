// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-operation progress records.
//!
//! ```text
//! start_operation --> Running --update_progress--> Running
//!                        |
//!        +---------------+----------------+
//!        v               v                v
//!    Completed         Failed         Cancelled     (first one wins)
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bitflags::bitflags;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::bus::{EventBus, ProgressEvent, ProgressTick};

bitflags! {
    /// Capabilities a tracked operation exposes to consumers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ProgressFlags: u8 {
        /// Consumers may request cancellation.
        const CAN_CANCEL = 0x01;

        /// Consumers may collapse the display.
        const CAN_MINIMIZE = 0x02;

        /// Runs without a foreground display.
        const BACKGROUND = 0x04;
    }
}

/// Options for [`ProgressReporter::start_operation`].
#[derive(Debug, Clone, Builder)]
pub struct ProgressOptions {
    #[builder(into, setters(name = with_title))]
    title: String,
    #[builder(into, setters(name = with_description))]
    description: Option<String>,
    #[builder(setters(name = with_flags), default)]
    flags: ProgressFlags,
    #[builder(setters(name = with_cancel_token))]
    cancel_token: Option<CancellationToken>,
}

/// Lifecycle state of a tracked operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationState {
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl OperationState {
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Snapshot of one tracked operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedOperation {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub state: OperationState,
    #[serde(skip)]
    pub flags: ProgressFlags,
    pub minimized: bool,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

struct Entry {
    operation: TrackedOperation,
    cancel_token: Option<CancellationToken>,
}

/// Records progress of running operations and forwards every change to an
/// [`EventBus`].
///
/// Unknown or finished ids are ignored by the update methods, which then
/// return `false`.
pub struct ProgressReporter {
    bus: Arc<EventBus>,
    operations: Mutex<BTreeMap<String, Entry>>,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            operations: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the bus events are published on.
    #[must_use]
    pub const fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Entry>> {
        self.operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts tracking `id`, replacing any earlier record under that id.
    pub fn start_operation(&self, id: impl Into<String>, options: ProgressOptions) {
        let id = id.into();
        let event = ProgressEvent::Started {
            operation_id: id.clone(),
            title: options.title.clone(),
            description: options.description.clone(),
            can_cancel: options.flags.contains(ProgressFlags::CAN_CANCEL),
        };

        let entry = Entry {
            operation: TrackedOperation {
                id: id.clone(),
                title: options.title,
                description: options.description,
                progress: 0,
                status: None,
                state: OperationState::Running,
                flags: options.flags,
                minimized: false,
                started_at: Utc::now(),
                finished_at: None,
                result: None,
                error: None,
            },
            cancel_token: options.cancel_token,
        };

        if self.lock().insert(id.clone(), entry).is_some() {
            tracing::debug!(operation = %id, "Restarted tracked operation");
        }
        self.bus.publish(&event);
    }

    /// Records a new percentage (clamped to 100) and optional status text.
    pub fn update_progress(&self, id: &str, progress: u8, status: Option<String>) -> bool {
        let progress = progress.min(100);
        {
            let mut operations = self.lock();
            let Some(entry) = operations
                .get_mut(id)
                .filter(|e| !e.operation.state.is_finished())
            else {
                tracing::trace!(operation = %id, "Progress for unknown operation ignored");
                return false;
            };
            entry.operation.progress = progress;
            entry.operation.status.clone_from(&status);
        }

        self.bus.publish(&ProgressEvent::Progress(ProgressTick {
            operation_id: id.to_string(),
            progress,
            status,
        }));
        true
    }

    /// Marks the operation completed with an optional payload.
    pub fn complete_operation(&self, id: &str, result: Option<Value>) -> bool {
        let event = ProgressEvent::Completed {
            operation_id: id.to_string(),
            result: result.clone(),
        };
        self.finish(id, OperationState::Completed, event, |op| {
            op.progress = 100;
            op.result = result;
        })
    }

    /// Marks the operation failed.
    pub fn fail_operation(&self, id: &str, error: impl Into<String>) -> bool {
        let error = error.into();
        let event = ProgressEvent::Failed {
            operation_id: id.to_string(),
            error: error.clone(),
        };
        self.finish(id, OperationState::Failed, event, |op| op.error = Some(error))
    }

    /// Marks the operation cancelled.
    pub fn cancel_operation(&self, id: &str) -> bool {
        let event = ProgressEvent::Cancelled {
            operation_id: id.to_string(),
        };
        self.finish(id, OperationState::Cancelled, event, |_| {})
    }

    fn finish<F>(&self, id: &str, state: OperationState, event: ProgressEvent, apply: F) -> bool
    where
        F: FnOnce(&mut TrackedOperation),
    {
        {
            let mut operations = self.lock();
            let Some(entry) = operations.get_mut(id) else {
                return false;
            };
            if entry.operation.state.is_finished() {
                tracing::trace!(
                    operation = %id,
                    current = ?entry.operation.state,
                    ignored = ?state,
                    "Operation already finished"
                );
                return false;
            }
            entry.operation.state = state;
            entry.operation.finished_at = Some(Utc::now());
            apply(&mut entry.operation);
        }

        self.bus.publish(&event);
        true
    }

    /// Fires the operation's cancellation token.
    ///
    /// Only succeeds for running operations started with
    /// [`ProgressFlags::CAN_CANCEL`] and a token. The state changes once the
    /// producer reports back through [`ProgressReporter::cancel_operation`].
    pub fn request_cancel(&self, id: &str) -> bool {
        let token = {
            let operations = self.lock();
            operations
                .get(id)
                .filter(|e| {
                    !e.operation.state.is_finished()
                        && e.operation.flags.contains(ProgressFlags::CAN_CANCEL)
                })
                .and_then(|e| e.cancel_token.clone())
        };

        token.is_some_and(|token| {
            tracing::info!(operation = %id, "Cancellation requested");
            token.cancel();
            true
        })
    }

    /// Collapses or restores the display of an operation with
    /// [`ProgressFlags::CAN_MINIMIZE`].
    pub fn set_minimized(&self, id: &str, minimized: bool) -> bool {
        let mut operations = self.lock();
        match operations.get_mut(id) {
            Some(entry) if entry.operation.flags.contains(ProgressFlags::CAN_MINIMIZE) => {
                entry.operation.minimized = minimized;
                true
            }
            _ => false,
        }
    }

    /// Returns a snapshot of one operation.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<TrackedOperation> {
        self.lock().get(id).map(|e| e.operation.clone())
    }

    /// Returns the running operations ordered by id.
    #[must_use]
    pub fn active_operations(&self) -> Vec<TrackedOperation> {
        self.lock()
            .values()
            .filter(|e| !e.operation.state.is_finished())
            .map(|e| e.operation.clone())
            .collect()
    }

    /// Forgets every finished operation and returns how many were removed.
    pub fn clear_finished(&self) -> usize {
        let mut operations = self.lock();
        let before = operations.len();
        operations.retain(|_, e| !e.operation.state.is_finished());
        before - operations.len()
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("tracked", &self.lock().len())
            .finish_non_exhaustive()
    }
}
