// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::time::Duration;

use serde_json::json;

use super::{BatchOperationConfig, BatchResult, BatchStatus, ItemOutcome};
use crate::config::types::BatchSettings;
use crate::error::ItemError;

#[test]
fn test_outcome_constructors() {
    let ok = ItemOutcome::succeeded("a", json!({ "n": 1 }), 2);
    assert!(ok.success);
    assert_eq!(ok.attempts, 2);
    assert_eq!(ok.result, Some(json!({ "n": 1 })));

    let unit = ItemOutcome::succeeded("b", serde_json::Value::Null, 1);
    assert!(unit.result.is_none());

    let timeout = ItemOutcome::failed("c", &ItemError::Timeout { timeout_ms: 50 }, 1);
    assert_eq!(timeout.error.as_deref(), Some("timed out after 50 ms"));
    assert!(!timeout.is_cancelled());

    let cancelled = ItemOutcome::cancelled("d");
    assert_eq!(cancelled.error.as_deref(), Some("cancelled"));
    assert_eq!(cancelled.attempts, 0);
    assert!(cancelled.is_cancelled());
}

#[test]
fn test_failed_with_cancelled_message_is_not_cancelled() {
    let outcome = ItemOutcome::failed("a", &ItemError::Failed("cancelled".to_string()), 1);
    assert!(!outcome.is_cancelled());
}

#[test]
fn test_result_counts_add_up() {
    let result = BatchResult::from_outcomes(
        "op",
        vec![
            ItemOutcome::succeeded("a", json!(null), 1),
            ItemOutcome::failed("b", &ItemError::Failed("boom".to_string()), 1),
            ItemOutcome::cancelled("c"),
        ],
        Duration::from_millis(12),
        BatchStatus::Cancelled,
    );

    assert_eq!(result.total_items, 3);
    assert_eq!(result.success_count, 1);
    assert_eq!(result.failure_count, 2);
    assert_eq!(result.cancelled_count, 1);
    assert_eq!(result.success_count + result.failure_count, result.results.len());
    assert_eq!(result.duration_ms, 12);
    assert!(!result.all_succeeded());

    let failed: Vec<_> = result.failures().map(|r| r.item_id.as_str()).collect();
    assert_eq!(failed, ["b", "c"]);

    insta::assert_snapshot!(
        result.summary(),
        @"op: 1 of 3 succeeded, 2 failed (1 cancelled) in 12 ms"
    );
}

#[test]
fn test_result_serializes_camel_case() {
    let result = BatchResult::from_outcomes(
        "op",
        vec![ItemOutcome::cancelled("x")],
        Duration::ZERO,
        BatchStatus::Cancelled,
    );
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["operationId"], "op");
    assert_eq!(value["cancelledCount"], 1);
    assert_eq!(value["status"], "cancelled");
    assert_eq!(
        value["results"][0],
        json!({ "itemId": "x", "success": false, "error": "cancelled", "attempts": 0, "cancelled": true })
    );
    assert!(value["completedAt"].is_string());
}

#[test]
fn test_status_activity() {
    assert!(BatchStatus::Running.is_active());
    assert!(BatchStatus::Paused.is_active());
    assert!(!BatchStatus::Idle.is_active());
    assert!(!BatchStatus::Completed.is_active());
    assert!(!BatchStatus::FailedToStart.is_active());
    assert_eq!(BatchStatus::default(), BatchStatus::Idle);
}

#[test]
fn test_config_defaults() {
    let config = BatchOperationConfig::default();
    assert_eq!(config.concurrency(), 4);
    assert_eq!(config.retry_attempts(), 0);
    assert_eq!(config.retry_delay(), Duration::from_secs(1));
    assert!(config.item_timeout().is_none());
}

#[test]
fn test_config_from_settings() {
    let settings = BatchSettings {
        concurrency: 2,
        retry_attempts: 3,
        retry_delay_ms: 250,
        item_timeout_ms: 5000,
    };
    let config = BatchOperationConfig::from_settings(&settings);
    assert_eq!(config.concurrency(), 2);
    assert_eq!(config.retry_attempts(), 3);
    assert_eq!(config.retry_delay(), Duration::from_millis(250));
    assert_eq!(config.item_timeout(), Some(Duration::from_secs(5)));

    let no_timeout = BatchOperationConfig::from_settings(&BatchSettings::default());
    assert!(no_timeout.item_timeout().is_none());
    assert!(format!("{no_timeout:?}").contains("on_item_complete: false"));
}
