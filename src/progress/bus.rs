// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed publish/subscribe channel for progress events.
//!
//! ```text
//! publish(event)
//!   lock: pick global sinks and sinks scoped to the event operation
//!   unlock
//!   call each listener in subscription order
//!   send to each channel, drop channels whose receiver is gone
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::Value;

/// One progress update for an in-flight operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressTick {
    pub operation_id: String,
    /// Percentage, 0 to 100.
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Everything a progress consumer can observe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ProgressEvent {
    Started {
        operation_id: String,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        can_cancel: bool,
    },
    Progress(ProgressTick),
    Completed {
        operation_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
    },
    Failed {
        operation_id: String,
        error: String,
    },
    Cancelled {
        operation_id: String,
    },
}

impl ProgressEvent {
    /// Returns the operation the event belongs to.
    #[must_use]
    pub fn operation_id(&self) -> &str {
        match self {
            Self::Started { operation_id, .. }
            | Self::Completed { operation_id, .. }
            | Self::Failed { operation_id, .. }
            | Self::Cancelled { operation_id } => operation_id,
            Self::Progress(tick) => &tick.operation_id,
        }
    }

    /// Returns whether no further events follow for this operation run.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Failed { .. } | Self::Cancelled { .. }
        )
    }
}

/// Callback invoked synchronously for each matching event.
pub type Listener = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Handle returned by the `subscribe*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
enum Sink {
    Callback(Listener),
    Channel(flume::Sender<ProgressEvent>),
}

struct Subscription {
    id: SubscriptionId,
    /// `None` receives every event.
    operation_id: Option<String>,
    sink: Sink,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

/// Event bus owned by the composition root and shared by producers and
/// consumers.
#[derive(Default)]
pub struct EventBus {
    inner: Mutex<BusInner>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BusInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add(&self, operation_id: Option<String>, sink: Sink) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscriptions.push(Subscription {
            id,
            operation_id,
            sink,
        });
        id
    }

    /// Subscribes to every event.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        self.add(None, Sink::Callback(Arc::new(listener)))
    }

    /// Subscribes to the events of one operation id.
    pub fn subscribe_operation<F>(&self, operation_id: impl Into<String>, listener: F) -> SubscriptionId
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        self.add(Some(operation_id.into()), Sink::Callback(Arc::new(listener)))
    }

    /// Subscribes to every event through an unbounded channel.
    ///
    /// The subscription is dropped on the first publish after the receiver
    /// goes away.
    pub fn subscribe_channel(&self) -> (SubscriptionId, flume::Receiver<ProgressEvent>) {
        let (tx, rx) = flume::unbounded();
        (self.add(None, Sink::Channel(tx)), rx)
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.subscriptions.len();
        inner.subscriptions.retain(|s| s.id != id);
        inner.subscriptions.len() != before
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscriptions.len()
    }

    /// Delivers `event` to every matching subscriber.
    pub fn publish(&self, event: &ProgressEvent) {
        let sinks: Vec<(SubscriptionId, Sink)> = {
            let inner = self.lock();
            inner
                .subscriptions
                .iter()
                .filter(|s| {
                    s.operation_id
                        .as_deref()
                        .is_none_or(|id| id == event.operation_id())
                })
                .map(|s| (s.id, s.sink.clone()))
                .collect()
        };

        let mut closed = Vec::new();
        for (id, sink) in sinks {
            match sink {
                Sink::Callback(listener) => listener(event),
                Sink::Channel(tx) => {
                    if tx.send(event.clone()).is_err() {
                        closed.push(id);
                    }
                }
            }
        }

        if !closed.is_empty() {
            tracing::trace!(count = closed.len(), "Dropping closed progress channels");
            self.lock().subscriptions.retain(|s| !closed.contains(&s.id));
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
