// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use skyfuse_core::{CancellationToken, FuseTask, Scope};
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_drop_cancels_task() {
    let (done_tx, done_rx) = oneshot::channel();

    let task = FuseTask::spawn(|cancel| async move {
        cancel.cancelled().await;
        let _ = done_tx.send(());
    });

    drop(task);

    let result = tokio::time::timeout(Duration::from_millis(200), done_rx).await;
    assert!(result.is_ok(), "task did not observe cancellation");
}

#[tokio::test]
async fn test_explicit_cancel_marks_task() {
    let task = FuseTask::spawn(|cancel| async move {
        cancel.cancelled().await;
    });

    assert!(!task.is_cancelled());
    task.cancel();
    task.cancel();
    assert!(task.is_cancelled());
}

#[tokio::test]
async fn test_tasks_sharing_a_token_stop_together() {
    let token = CancellationToken::new();
    let scope = Scope::new();
    let (a_tx, a_rx) = oneshot::channel();
    let (b_tx, b_rx) = oneshot::channel();

    let a_token = token.clone();
    let task_a = scope.spawn(token.clone(), async move {
        a_token.cancelled().await;
        let _ = a_tx.send(());
    });
    let b_token = token.clone();
    let _task_b = scope.spawn(token.clone(), async move {
        b_token.cancelled().await;
        let _ = b_tx.send(());
    });

    drop(task_a);

    assert!(tokio::time::timeout(Duration::from_millis(200), a_rx).await.is_ok());
    assert!(tokio::time::timeout(Duration::from_millis(200), b_rx).await.is_ok());
}

#[test]
fn test_scope_with_handle_spawns_on_that_runtime() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("runtime");
    let scope = Scope::with_handle(runtime.handle().clone());
    let (tx, rx) = std::sync::mpsc::channel();

    // No runtime is entered on this thread; the handle is used instead
    let _task = scope.spawn(CancellationToken::new(), async move {
        let _ = tx.send(42);
    });

    assert_eq!(rx.recv_timeout(Duration::from_secs(1)), Ok(42));
}
