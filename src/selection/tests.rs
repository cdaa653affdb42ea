// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{SelectionScope, SelectionStore};
use crate::error::{BatchlocError, SelectionError};

fn abc() -> SelectionStore {
    SelectionStore::with_available(["a", "b", "c"])
}

fn assert_derived(store: &SelectionStore) {
    assert_eq!(store.selected_count(), store.selected_items().len());
    assert_eq!(store.has_selection(), store.selected_count() > 0);
}

#[test]
fn test_select_all_and_none() {
    let mut store = SelectionStore::with_available(["item1", "item2"]);
    store.select_all();
    assert_eq!(store.selected_count(), 2);
    assert_derived(&store);

    store.select_none();
    assert_eq!(store.selected_count(), 0);
    assert!(!store.has_selection());
}

#[test]
fn test_toggle_item_twice_is_identity() {
    let mut store = SelectionStore::with_available(["item1", "item2"]);
    store.toggle_item("item1");
    assert!(store.is_selected("item1"));
    store.toggle_item("item1");
    assert!(!store.is_selected("item1"));
    assert_eq!(store.selected_count(), 0);
}

#[test]
fn test_toggle_item_accepts_unknown_id() {
    let mut store = abc();
    store.toggle_item("zzz");
    assert!(store.is_selected("zzz"));
    assert_eq!(store.selected_count(), 1);
}

#[test]
fn test_toggle_all_selects_unselected_group() {
    let mut store = abc();
    store.toggle_all(&["a", "b"]);
    assert_eq!(store.selected_count(), 2);
    assert!(store.is_selected("a") && store.is_selected("b"));
}

#[test]
fn test_toggle_all_clears_fully_selected_group() {
    let mut store = abc();
    store.toggle_all(&["a", "b"]);
    store.toggle_all(&["a", "b"]);
    assert_eq!(store.selected_count(), 0);
}

#[test]
fn test_toggle_all_completes_partial_group() {
    let mut store = abc();
    store.toggle_item("a");
    assert_eq!(store.selected_count(), 1);
    store.toggle_all(&["a", "b"]);
    assert_eq!(store.selected_count(), 2);
    assert!(store.is_selected("a") && store.is_selected("b"));
}

#[test]
fn test_toggle_all_leaves_other_ids() {
    let mut store = abc();
    store.toggle_item("c");
    store.toggle_all(&["a", "b"]);
    store.toggle_all(&["a", "b"]);
    assert_eq!(store.snapshot(), ["c"]);
}

#[test]
fn test_set_available_items_keeps_selection() {
    let mut store = abc();
    store.select_all();
    store.set_available_items(["x"]);
    assert_eq!(store.selected_count(), 3);
    assert_eq!(store.available_items(), ["x"]);
}

#[test]
fn test_derived_values_over_mixed_sequence() {
    let mut store = abc();
    store.select_all();
    assert_derived(&store);
    store.toggle_item("b");
    assert_derived(&store);
    store.select_none();
    assert_derived(&store);
    store.toggle_item("a");
    assert_derived(&store);
}

#[test]
fn test_snapshot_order() {
    let mut store = SelectionStore::with_available(["c", "a", "b"]);
    store.toggle_item("zeta");
    store.toggle_item("b");
    store.toggle_item("c");
    store.toggle_item("alpha");
    assert_eq!(store.snapshot(), ["c", "b", "alpha", "zeta"]);
}

#[test]
fn test_snapshot_is_detached() {
    let mut store = abc();
    store.select_all();
    let snapshot = store.snapshot();
    store.select_none();
    assert_eq!(snapshot, ["a", "b", "c"]);
}

#[test]
fn test_select_matching() {
    let mut store =
        SelectionStore::with_available(["lang/en.json", "lang/it.json", "subs/intro.srt"]);
    let added = store.select_matching("lang/*.json").unwrap();
    assert_eq!(added, 2);
    assert_eq!(store.select_matching("lang/*.json").unwrap(), 0);
    assert!(!store.is_selected("subs/intro.srt"));
}

#[test]
fn test_select_matching_invalid_glob() {
    let mut store = abc();
    assert!(store.select_matching("a[").is_err());
}

#[test]
fn test_scope_outside_mount_errors() {
    let scope = SelectionScope::new();
    let err = scope.store().unwrap_err();
    assert!(matches!(err, BatchlocError::Selection(ref e) if **e == SelectionError::OutsideScope));
    insta::assert_snapshot!(
        err.to_string(),
        @"selection error: selection store must be used within a mounted SelectionScope"
    );
}

#[test]
fn test_scope_lifecycle() {
    let mut scope = SelectionScope::new();
    assert!(!scope.is_mounted());

    let store = scope.mount();
    store.set_available_items(["a"]);
    store.select_all();
    assert_eq!(scope.store().unwrap().selected_count(), 1);

    scope.unmount();
    assert!(scope.store_mut().is_err());

    scope.mount();
    assert_eq!(scope.store().unwrap().selected_count(), 0);
}
