// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Selection store for list-based batch targets.
//!
//! ```text
//! SelectionScope (mount / unmount)
//!      |
//!      v
//! SelectionStore
//!   available: [a, b, c]      replaced wholesale
//!   selected:  {a, c}         plain set, never pruned
//!      |
//!      v
//!   snapshot() --> [a, c]     owned Vec handed to the runner
//! ```
//!
//! Every operation is a total, synchronous state transition. Selected ids are
//! not validated against the available pool: `set_available_items` keeps
//! stale selections until the caller clears them.

use std::collections::BTreeSet;

use anyhow::Context;
use wax::{Glob, Program};

use crate::error::{BatchlocResult, Result, SelectionError};

/// Tracks which item ids are checked out of the available pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    /// Selectable ids in display order.
    available: Vec<String>,

    /// Currently checked ids.
    selected: BTreeSet<String>,
}

impl SelectionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given pool and nothing selected.
    #[must_use]
    pub fn with_available<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        store.set_available_items(ids);
        store
    }

    /// Replaces the pool of selectable ids. The selection is left untouched.
    pub fn set_available_items<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available = ids.into_iter().map(Into::into).collect();
    }

    /// Returns the selectable ids in order.
    #[must_use]
    pub fn available_items(&self) -> &[String] {
        &self.available
    }

    /// Returns the selected ids.
    #[must_use]
    pub const fn selected_items(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Selects every available id.
    pub fn select_all(&mut self) {
        self.selected = self.available.iter().cloned().collect();
    }

    /// Clears the selection.
    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Flips membership of `id`.
    pub fn toggle_item(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Toggles a group of ids as a unit.
    ///
    /// If every id is selected the group is deselected, otherwise the whole
    /// group is selected. A partially selected group therefore completes.
    pub fn toggle_all<S: AsRef<str>>(&mut self, ids: &[S]) {
        let all_selected = ids.iter().all(|id| self.selected.contains(id.as_ref()));
        if all_selected {
            for id in ids {
                self.selected.remove(id.as_ref());
            }
        } else {
            self.selected
                .extend(ids.iter().map(|id| id.as_ref().to_string()));
        }
    }

    /// Returns whether `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Returns whether anything is selected.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Returns the number of selected ids.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selects every available id matching a glob pattern.
    ///
    /// Returns how many ids were newly selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid glob.
    pub fn select_matching(&mut self, pattern: &str) -> Result<usize> {
        let glob = Glob::new(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;

        let before = self.selected.len();
        let matched: Vec<String> = self
            .available
            .iter()
            .filter(|id| glob.is_match(id.as_str()))
            .cloned()
            .collect();
        self.selected.extend(matched);

        Ok(self.selected.len() - before)
    }

    /// Materializes the selection into an owned, ordered list.
    ///
    /// Selected ids come in pool order first, then selected ids missing from
    /// the pool in sorted order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        let mut ordered: Vec<String> = Vec::with_capacity(self.selected.len());
        let mut seen = BTreeSet::new();

        for id in &self.available {
            if self.selected.contains(id) && seen.insert(id.as_str()) {
                ordered.push(id.clone());
            }
        }

        ordered.extend(
            self.selected
                .iter()
                .filter(|id| !seen.contains(id.as_str()))
                .cloned(),
        );

        ordered
    }
}

/// Ownership boundary for a [`SelectionStore`].
///
/// The store exists only while the scope is mounted and is discarded on
/// unmount. Handlers receive the scope explicitly and must go through
/// [`SelectionScope::store`] or [`SelectionScope::store_mut`].
#[derive(Debug, Default)]
pub struct SelectionScope {
    store: Option<SelectionStore>,
}

impl SelectionScope {
    /// Creates an unmounted scope.
    #[must_use]
    pub const fn new() -> Self {
        Self { store: None }
    }

    /// Mounts a fresh, empty store, replacing any previous one.
    pub fn mount(&mut self) -> &mut SelectionStore {
        tracing::trace!("Mounting selection scope");
        self.store.insert(SelectionStore::new())
    }

    /// Discards the store.
    pub fn unmount(&mut self) {
        tracing::trace!("Unmounting selection scope");
        self.store = None;
    }

    /// Returns whether a store is mounted.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.store.is_some()
    }

    /// Returns the mounted store.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::OutsideScope` if nothing is mounted.
    pub fn store(&self) -> BatchlocResult<&SelectionStore> {
        self.store
            .as_ref()
            .ok_or_else(|| SelectionError::OutsideScope.into())
    }

    /// Returns the mounted store mutably.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::OutsideScope` if nothing is mounted.
    pub fn store_mut(&mut self) -> BatchlocResult<&mut SelectionStore> {
        self.store
            .as_mut()
            .ok_or_else(|| SelectionError::OutsideScope.into())
    }
}

#[cfg(test)]
mod tests;
