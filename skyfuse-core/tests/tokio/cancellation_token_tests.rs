// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::future::Future;
use core::task::{Context, Poll};
use futures::FutureExt;
use skyfuse_core::{CancellationToken, Scope};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_new_token_not_cancelled() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
}

#[test]
fn test_cancel_is_idempotent() {
    let token = CancellationToken::new();
    assert!(token.cancel());
    assert!(!token.cancel());
    assert!(!token.cancel());
    assert!(token.is_cancelled());
}

#[test]
fn test_clone_shares_state() {
    let token1 = CancellationToken::new();
    let token2 = token1.clone();

    token2.cancel();

    assert!(token1.is_cancelled());
    assert!(token2.is_cancelled());
}

#[test]
fn test_cancel_before_first_poll() {
    let token = CancellationToken::new();
    token.cancel();

    let mut future = Box::pin(token.cancelled());
    let waker = futures::task::noop_waker();
    let mut cx = Context::from_waker(&waker);

    match future.as_mut().poll(&mut cx) {
        Poll::Ready(()) => {}
        Poll::Pending => panic!("Expected Ready, got Pending"),
    }
}

#[test]
fn test_scope_cancel_twice_is_harmless() {
    let scope = Scope::new();
    let clone = scope.clone();

    scope.cancel();
    clone.cancel();

    assert!(scope.is_cancelled());
    assert!(scope.token().is_cancelled());
}

// ============================================================================
// Async Tests
// ============================================================================

#[tokio::test]
async fn test_cancelled_waits_until_cancel() {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    let handle = tokio::spawn(async move {
        token_clone.cancelled().await;
        true
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    token.cancel();

    let result = tokio::time::timeout(Duration::from_millis(100), handle).await;
    assert!(result.expect("waiter should finish").expect("task panicked"));
}

#[tokio::test]
async fn test_owned_future_resolves_on_cancel() {
    let token = CancellationToken::new();
    let owned = token.clone().cancelled_owned();

    let handle = tokio::spawn(owned);
    tokio::time::sleep(Duration::from_millis(10)).await;
    token.cancel();

    let result = tokio::time::timeout(Duration::from_millis(100), handle).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_concurrent_cancel_from_many_tasks() {
    let token = CancellationToken::new();
    let winners = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for _ in 0..16 {
        let token = token.clone();
        let winners = winners.clone();
        handles.push(tokio::spawn(async move {
            if token.cancel() {
                winners.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    for handle in handles {
        handle.await.expect("cancel task panicked");
    }

    assert!(token.is_cancelled());
    assert_eq!(winners.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_race_condition_cancel_during_listen_registration() {
    for _ in 0..100 {
        let token = CancellationToken::new();
        let token_cancel = token.clone();

        let handle = tokio::spawn(async move {
            token.cancelled().await;
        });

        token_cancel.cancel();

        let result = tokio::time::timeout(Duration::from_millis(100), handle).await;
        assert!(result.is_ok(), "Task didn't complete after cancel");
    }
}

#[tokio::test]
async fn test_scope_cancellation_wakes_select() {
    let scope = Scope::new();
    let worker_scope = scope.clone();

    let worker = tokio::spawn(async move {
        futures::select! {
            _ = worker_scope.cancelled().fuse() => "cancelled",
            _ = tokio::time::sleep(Duration::from_secs(10)).fuse() => "timeout",
        }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    scope.cancel();

    assert_eq!(worker.await.expect("worker panicked"), "cancelled");
}
