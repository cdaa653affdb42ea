// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Progress reporting decoupled from the code that produces it.
//!
//! ```text
//! BatchRunner --> ProgressReporter --> EventBus --+--> listener (all events)
//!                 (per-id records)                +--> listener (one id)
//!                                                 +--> flume::Receiver
//!                                                 +--> ConsoleProgress (indicatif)
//! ```
//!
//! The bus is created by the host and handed to producers and consumers
//! explicitly. Listeners run synchronously on the publishing task, in
//! subscription order.

pub mod bus;
pub mod console;
pub mod reporter;

pub use bus::{EventBus, Listener, ProgressEvent, ProgressTick, SubscriptionId};
pub use console::{ConsoleProgress, ProgressDisplay};
pub use reporter::{
    OperationState, ProgressFlags, ProgressOptions, ProgressReporter, TrackedOperation,
};
