// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Caller supplied execution and cancellation context.

use crate::{CancellationToken, Cancelled, CancelledOwned, FuseTask};
use core::future::Future;
use tokio::runtime::Handle;

/// The scheduling domain a combination runs in.
///
/// A `Scope` pairs a [`CancellationToken`] with the runtime that listener
/// tasks are spawned on. Cancelling the scope ends every sequence created in
/// it. Clones share the same token.
///
/// ```
/// use skyfuse_core::Scope;
///
/// let scope = Scope::new();
/// let screen = scope.clone();
///
/// screen.cancel();
/// screen.cancel();
/// assert!(scope.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Scope {
    token: CancellationToken,
    handle: Option<Handle>,
}

impl Scope {
    /// A scope that spawns on whatever tokio runtime is current when work starts.
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope pinned to a specific runtime.
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            token: CancellationToken::new(),
            handle: Some(handle),
        }
    }

    /// Cancel everything running in this scope. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancelled(&self) -> Cancelled<'_> {
        self.token.cancelled()
    }

    pub fn cancelled_owned(&self) -> CancelledOwned {
        self.token.clone().cancelled_owned()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Spawn `future` in this scope, bound to `cancel`.
    ///
    /// The future is expected to watch both `cancel` and the scope.
    pub fn spawn<Fut>(&self, cancel: CancellationToken, future: Fut) -> FuseTask
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        FuseTask::spawn_with_token(cancel, self.handle.as_ref(), future)
    }
}
