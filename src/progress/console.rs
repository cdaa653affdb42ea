// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Terminal rendering of one operation's progress.

use std::sync::{Arc, OnceLock};

use indicatif::{ProgressBar, ProgressStyle};

use super::bus::{EventBus, ProgressEvent, SubscriptionId};

/// Pre-validated bar style for percentage progress.
fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos:>3}% {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

/// How progress is shown on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressDisplay {
    /// Percentage bar with status text.
    #[default]
    Bar,
    /// No visual progress.
    Silent,
}

/// Progress bar that follows one operation on an [`EventBus`].
///
/// Unsubscribes when dropped.
pub struct ConsoleProgress {
    bus: Arc<EventBus>,
    subscription: Option<SubscriptionId>,
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    /// Subscribes a renderer to `operation_id`.
    #[must_use]
    pub fn attach(bus: Arc<EventBus>, operation_id: &str, display: ProgressDisplay) -> Self {
        let bar = match display {
            ProgressDisplay::Silent => None,
            ProgressDisplay::Bar => {
                let pb = ProgressBar::new(100);
                pb.set_style(bar_style());
                pb.set_message(operation_id.to_string());
                Some(pb)
            }
        };

        let subscription = bar.clone().map(|pb| {
            bus.subscribe_operation(operation_id, move |event| render(&pb, event))
        });

        Self {
            bus,
            subscription,
            bar,
        }
    }

    /// Returns whether a bar is drawn.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}

fn render(pb: &ProgressBar, event: &ProgressEvent) {
    match event {
        ProgressEvent::Started { title, .. } => pb.set_message(title.clone()),
        ProgressEvent::Progress(tick) => {
            pb.set_position(u64::from(tick.progress));
            if let Some(status) = &tick.status {
                pb.set_message(status.clone());
            }
        }
        ProgressEvent::Completed { .. } => pb.finish_with_message("done"),
        ProgressEvent::Failed { error, .. } => pb.abandon_with_message(error.clone()),
        ProgressEvent::Cancelled { .. } => pb.abandon_with_message("cancelled"),
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.bus.unsubscribe(id);
        }
        if let Some(pb) = &self.bar
            && !pb.is_finished()
        {
            pb.finish_and_clear();
        }
    }
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("subscription", &self.subscription)
            .field("visible", &self.is_visible())
            .finish_non_exhaustive()
    }
}
