// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Batch-capable operations.
//!
//! # Architecture
//!
//! ```text
//! OperationRegistry (static, ordered)
//!      |
//!      v
//! Arc<dyn BatchOperation>
//!   descriptor() --> id, name, requires_confirmation
//!   process_item(id, &ItemContext) --> Result<Value>
//!      |
//!      v
//! BatchRunner turns per-item work into one BatchResult
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`BatchOperation`] | Trait every operation implements |
//! | [`OperationDescriptor`] | Static id, label and confirmation flag |
//! | [`ItemContext`] | Cancellation token and attempt number for one item |
//! | [`FnOperation`] | Adapts a closure into a [`BatchOperation`] |
//! | [`registry::OperationRegistry`] | Catalog handed to the host at startup |
//!
//! ## Adding a New Operation
//!
//! 1. Create a struct holding its [`OperationDescriptor`]
//! 2. Implement [`BatchOperation`] for it
//! 3. Add it to the list passed to [`registry::OperationRegistry::from_operations`]

pub mod builtin;
pub mod registry;

use std::future::Future;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Static description of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    id: String,
    name: String,
    requires_confirmation: bool,
}

impl OperationDescriptor {
    /// Creates a descriptor that runs without confirmation.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            requires_confirmation: false,
        }
    }

    /// Sets whether the host must confirm before running.
    #[must_use]
    pub const fn with_confirmation(mut self, required: bool) -> Self {
        self.requires_confirmation = required;
        self
    }

    /// Returns the unique id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether explicit confirmation is needed.
    #[must_use]
    pub const fn requires_confirmation(&self) -> bool {
        self.requires_confirmation
    }
}

/// Context handed to an operation for one item.
#[derive(Debug, Clone)]
pub struct ItemContext {
    cancel_token: CancellationToken,
    attempt: u32,
}

impl ItemContext {
    /// Creates a context for the given attempt (1-based).
    #[must_use]
    pub const fn new(cancel_token: CancellationToken, attempt: u32) -> Self {
        Self {
            cancel_token,
            attempt,
        }
    }

    /// Gets a reference to the cancellation token.
    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    /// Checks if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Returns the attempt number, starting at 1.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }
}

/// An action that can be applied to a list of item ids.
///
/// Implementors handle one item at a time; the runner owns fan-out,
/// retries, timeouts and aggregation. Long-running implementations should
/// poll [`ItemContext::is_cancelled`] since in-flight work is never aborted.
///
/// # Example
///
/// ```ignore
/// impl BatchOperation for Touch {
///     fn descriptor(&self) -> &OperationDescriptor { &self.descriptor }
///     fn process_item<'a>(&'a self, id: &'a str, _ctx: &'a ItemContext)
///         -> BoxFuture<'a, Result<serde_json::Value>> {
///         Box::pin(async move { Ok(serde_json::json!({ "touched": id })) })
///     }
/// }
/// ```
pub trait BatchOperation: Send + Sync {
    /// Returns the static descriptor.
    fn descriptor(&self) -> &OperationDescriptor;

    /// Processes one item and returns an optional payload for the result.
    fn process_item<'a>(
        &'a self,
        item_id: &'a str,
        ctx: &'a ItemContext,
    ) -> BoxFuture<'a, Result<serde_json::Value>>;
}

/// [`BatchOperation`] backed by a closure.
pub struct FnOperation<F> {
    descriptor: OperationDescriptor,
    handler: F,
}

impl<F> FnOperation<F> {
    /// Wraps `handler` under `descriptor`.
    pub const fn new(descriptor: OperationDescriptor, handler: F) -> Self {
        Self {
            descriptor,
            handler,
        }
    }
}

impl<F> std::fmt::Debug for FnOperation<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnOperation")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl<F, Fut> BatchOperation for FnOperation<F>
where
    F: Fn(String, ItemContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value>> + Send + 'static,
{
    fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    fn process_item<'a>(
        &'a self,
        item_id: &'a str,
        ctx: &'a ItemContext,
    ) -> BoxFuture<'a, Result<serde_json::Value>> {
        Box::pin((self.handler)(item_id.to_string(), ctx.clone()))
    }
}
