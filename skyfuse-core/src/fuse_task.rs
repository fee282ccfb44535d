// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Task spawning with cooperative cancellation.

use crate::CancellationToken;
use core::future::Future;
use tokio::runtime::Handle;

/// Background task handle with automatic cancellation on drop.
///
/// The spawned future receives (or shares) a [`CancellationToken`] that it
/// must watch. Dropping the `FuseTask` or calling [`cancel()`](Self::cancel)
/// signals the token; the task exits at its next cancellation checkpoint.
///
/// # Example
///
/// ```rust
/// use skyfuse_core::FuseTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = FuseTask::spawn(|cancel| async move {
///     cancel.cancelled().await;
/// });
///
/// assert!(!task.is_cancelled());
/// drop(task);
/// # }
/// ```
#[derive(Debug)]
pub struct FuseTask {
    cancel: CancellationToken,
}

impl FuseTask {
    /// Spawn a task on the ambient tokio runtime with a fresh token.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        Self::spawn_with_token(cancel.clone(), None, f(cancel))
    }

    /// Spawn `future`, tying its lifetime to an existing token.
    ///
    /// Several tasks may share one token; dropping any of their handles
    /// cancels all of them. With `handle == None` the ambient runtime is used.
    pub fn spawn_with_token<Fut>(
        cancel: CancellationToken,
        handle: Option<&Handle>,
        future: Fut,
    ) -> Self
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        match handle {
            Some(handle) => drop(handle.spawn(future)),
            None => drop(tokio::spawn(future)),
        }

        Self { cancel }
    }

    /// Signal the task to stop. Does not wait for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for FuseTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
