// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::channel::mpsc::unbounded;
use futures::StreamExt;
use skyfuse_core::{CancellationToken, FuseError, StreamItem};
use skyfuse_exec::SubscribeExt;
use skyfuse_test_utils::{test_channel, test_channel_with_errors};
use std::sync::{Arc, Mutex};
use tokio::spawn;
use tokio::time::{timeout, Duration};

#[derive(Debug, thiserror::Error)]
#[error("Test error: {0}")]
struct TestError(String);

#[tokio::test]
async fn test_subscribe_processes_values_in_order() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    // Act
    for value in 1..=5 {
        tx.send(value)?;
    }
    drop(tx);

    stream
        .subscribe(
            move |value, _token| {
                let sink = sink.clone();
                async move {
                    tokio::task::yield_now().await;
                    sink.lock().unwrap().push(value);
                    Ok::<(), TestError>(())
                }
            },
            |error| panic!("unexpected error: {error}"),
            None,
        )
        .await?;

    // Assert
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    Ok(())
}

#[tokio::test]
async fn test_subscribe_handler_error_continues() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let error_sink = errors.clone();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    for value in 1..=4 {
        tx.send(value)?;
    }
    drop(tx);

    // Act
    stream
        .subscribe(
            move |value, _token| {
                let sink = sink.clone();
                async move {
                    if value % 2 == 0 {
                        return Err(TestError(format!("even {value}")));
                    }
                    sink.lock().unwrap().push(value);
                    Ok(())
                }
            },
            move |error| error_sink.lock().unwrap().push(error.to_string()),
            None,
        )
        .await?;

    // Assert
    assert_eq!(*seen.lock().unwrap(), vec![1, 3]);
    assert_eq!(
        *errors.lock().unwrap(),
        vec![
            "User error: Test error: even 2".to_string(),
            "User error: Test error: even 4".to_string()
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_subscribe_upstream_error_stops() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel_with_errors::<i32>();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let error_sink = errors.clone();

    tx.send(StreamItem::Value(1))?;
    tx.send(StreamItem::Error(FuseError::stream_error("source lost")))?;
    tx.send(StreamItem::Value(2))?;

    // Act
    let result = timeout(
        Duration::from_millis(500),
        stream.subscribe(
            move |value, _token| {
                let sink = sink.clone();
                async move {
                    sink.lock().unwrap().push(value);
                    Ok::<(), TestError>(())
                }
            },
            move |error| error_sink.lock().unwrap().push(error.to_string()),
            None,
        ),
    )
    .await?;

    // Assert
    assert!(result.is_ok());
    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(*errors.lock().unwrap(), vec!["Stream processing error: source lost".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_subscribe_cancellation_while_waiting() -> anyhow::Result<()> {
    // Arrange
    let (_tx, stream) = test_channel::<i32>();
    let token = CancellationToken::new();
    let (done_tx, mut done_rx) = unbounded();

    let subscription = spawn({
        let token = token.clone();
        async move {
            let result = stream
                .subscribe(
                    |_value, _token| async { Ok::<(), TestError>(()) },
                    |_error| {},
                    Some(token),
                )
                .await;
            let _ = done_tx.unbounded_send(());
            result
        }
    });

    // Act
    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    // Assert
    timeout(Duration::from_millis(500), done_rx.next()).await?;
    subscription.await??;
    Ok(())
}
