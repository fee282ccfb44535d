// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use skyfuse_core::StateCell;
use std::time::Duration;

#[tokio::test]
async fn test_cell_starts_absent() {
    let cell = StateCell::<String>::new();
    assert_eq!(cell.get(), None);

    let mut updates = cell.subscribe();
    let nothing = tokio::time::timeout(Duration::from_millis(50), updates.next()).await;
    assert!(nothing.is_err(), "absent cell must not emit");
}

#[tokio::test]
async fn test_late_subscriber_sees_current_value() {
    let cell = StateCell::new();
    cell.set((true, "Product Connected".to_string()));

    let mut updates = cell.subscribe();
    assert_eq!(
        updates.next().await,
        Some((true, "Product Connected".to_string()))
    );
}

#[tokio::test]
async fn test_last_write_wins_for_slow_subscriber() {
    let cell = StateCell::new();
    let mut updates = cell.subscribe();

    cell.set(1);
    cell.set(2);
    cell.set(3);

    assert_eq!(updates.next().await, Some(3));
    assert_eq!(cell.get(), Some(3));
}

#[tokio::test]
async fn test_clones_share_value_and_subscribers() {
    let cell = StateCell::new();
    let writer = cell.clone();
    let mut updates = cell.subscribe();

    writer.set("registered");

    assert_eq!(updates.next().await, Some("registered"));
    assert_eq!(cell.subscriber_count(), 1);

    drop(updates);
    assert_eq!(cell.subscriber_count(), 0);
}

#[tokio::test]
async fn test_clear_returns_to_absent_without_emitting() {
    let cell = StateCell::new();
    cell.set(7u32);
    let mut updates = cell.subscribe();
    assert_eq!(updates.next().await, Some(7));

    cell.clear();
    assert_eq!(cell.get(), None);
    let nothing = tokio::time::timeout(Duration::from_millis(50), updates.next()).await;
    assert!(nothing.is_err());

    cell.set(8);
    assert_eq!(updates.next().await, Some(8));
}
