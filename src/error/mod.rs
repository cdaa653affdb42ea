// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!          BatchlocError (<= 24 bytes)
//!                  |
//!     +--------+---+------+--------+
//!     v        v          v        v
//!   Config   Batch    Selection   Io
//!    Box      Box        Box      Box
//!
//! Sub-errors (unboxed internally):
//!   Config    InvalidValue
//!   Batch     OperationNotFound, ConfirmationRequired, InvalidConfig,
//!             InvalidDescriptor, DuplicateOperation, AlreadyRunning
//!   Selection OutsideScope
//!
//! ItemError is never propagated: the runner renders it into
//! ItemOutcome::error and keeps going.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`BatchlocError`].
pub type BatchlocResult<T> = std::result::Result<T, BatchlocError>;

/// Top-level library error type.
///
/// All sub-errors are boxed to keep this enum at ~16 bytes on the stack.
#[derive(Debug, Error)]
pub enum BatchlocError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Batch could not be started.
    #[error("batch error: {0}")]
    Batch(#[from] Box<BatchError>),

    /// Selection store misuse.
    #[error("selection error: {0}")]
    Selection(#[from] Box<SelectionError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

impl BatchlocError {
    /// Returns the batch sub-error, if this is one.
    #[must_use]
    pub fn as_batch(&self) -> Option<&BatchError> {
        match self {
            Self::Batch(e) => Some(e),
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for BatchlocError {
                fn from(err: $error) -> Self {
                    BatchlocError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    BatchError => Batch,
    SelectionError => Selection,
    std::io::Error => Io,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Batch Errors ---

/// Errors that prevent a batch from starting.
///
/// Everything that happens after the start is captured per item instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    /// No operation is registered under this id.
    #[error("operation '{0}' not found")]
    OperationNotFound(String),

    /// The operation needs explicit confirmation and none was given.
    #[error("operation '{0}' requires confirmation before it can run")]
    ConfirmationRequired(String),

    /// The runner configuration cannot execute anything.
    #[error("invalid configuration for operation '{operation}': {message}")]
    InvalidConfig { operation: String, message: String },

    /// The descriptor is missing a required field.
    #[error("invalid operation descriptor: {0}")]
    InvalidDescriptor(String),

    /// Two operations share an id.
    #[error("operation '{0}' is already registered")]
    DuplicateOperation(String),

    /// The runner is already executing a batch.
    #[error("runner is already executing operation '{0}'")]
    AlreadyRunning(String),
}

// --- Item Errors ---

/// Failure of a single item, recorded in the batch result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemError {
    /// The operation returned an error.
    #[error("{0}")]
    Failed(String),

    /// The item did not finish within the configured timeout.
    #[error("timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The item was never dispatched because the batch was cancelled.
    #[error("cancelled")]
    Cancelled,
}

// --- Selection Errors ---

/// Selection store access errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// The scope has no mounted store.
    #[error("selection store must be used within a mounted SelectionScope")]
    OutsideScope,
}
