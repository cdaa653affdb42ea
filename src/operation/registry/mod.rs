// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Operation registry for the batch actions a view offers.
//!
//! ```text
//! from_operations([estimate-entries, validate, backup, ...])
//!   reject empty id/name and duplicates
//!   keep registration order for display
//! get("backup")       --> Arc<dyn BatchOperation>
//! match_pattern("*-backup") --> [remove-backup]
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use wax::{Glob, Program};

use super::{BatchOperation, OperationDescriptor};
use crate::error::{BatchError, BatchlocResult, Result};

/// Catalog of operations, fixed at configuration time.
#[derive(Default)]
pub struct OperationRegistry {
    /// Operations in registration order.
    operations: Vec<Arc<dyn BatchOperation>>,

    /// Index into `operations` by id.
    index: HashMap<String, usize>,
}

impl OperationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a static list of operations.
    ///
    /// # Errors
    ///
    /// Returns `BatchError::InvalidDescriptor` for an empty id or name and
    /// `BatchError::DuplicateOperation` when two operations share an id.
    pub fn from_operations<I>(operations: I) -> BatchlocResult<Self>
    where
        I: IntoIterator<Item = Arc<dyn BatchOperation>>,
    {
        let mut registry = Self::new();
        for operation in operations {
            registry.register(operation)?;
        }
        Ok(registry)
    }

    /// Registers one operation.
    ///
    /// # Errors
    ///
    /// See [`OperationRegistry::from_operations`].
    pub fn register(&mut self, operation: Arc<dyn BatchOperation>) -> BatchlocResult<()> {
        let descriptor = operation.descriptor();
        if descriptor.id().trim().is_empty() {
            return Err(BatchError::InvalidDescriptor("operation id is empty".to_string()).into());
        }
        if descriptor.name().trim().is_empty() {
            return Err(BatchError::InvalidDescriptor(format!(
                "operation '{}' has an empty name",
                descriptor.id()
            ))
            .into());
        }
        if self.index.contains_key(descriptor.id()) {
            return Err(BatchError::DuplicateOperation(descriptor.id().to_string()).into());
        }

        tracing::debug!(operation = %descriptor.id(), "Registered operation");
        self.index
            .insert(descriptor.id().to_string(), self.operations.len());
        self.operations.push(operation);
        Ok(())
    }

    /// Looks up an operation by id.
    ///
    /// # Errors
    ///
    /// Returns `BatchError::OperationNotFound` for an unknown id.
    pub fn get(&self, id: &str) -> BatchlocResult<Arc<dyn BatchOperation>> {
        self.index
            .get(id)
            .map(|&i| Arc::clone(&self.operations[i]))
            .ok_or_else(|| BatchError::OperationNotFound(id.to_string()).into())
    }

    /// Returns whether an id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the number of operations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Iterates descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations.iter().map(|op| op.descriptor())
    }

    /// Matches a glob pattern against registered ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid glob.
    pub fn match_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        if self.contains(pattern) {
            return Ok(vec![pattern.to_string()]);
        }

        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;

        Ok(self
            .descriptors()
            .filter(|d| glob.is_match(d.id()))
            .map(|d| d.id().to_string())
            .collect())
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.descriptors()).finish()
    }
}
