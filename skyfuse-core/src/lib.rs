// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core building blocks shared by every skyfuse crate.
//!
//! - [`StreamItem`] / [`FuseError`]: in-band values and failures
//! - [`CancellationToken`] / [`Scope`] / [`FuseTask`]: cooperative cancellation
//! - [`StateCell`]: last-write-wins current-value broadcast

pub mod cancellation_token;
pub mod error;
pub mod fuse_mutex;
pub mod fuse_task;
pub mod scope;
pub mod state_cell;
pub mod stream_item;

pub use self::cancellation_token::{CancellationToken, Cancelled, CancelledOwned};
pub use self::error::{FuseError, Result};
pub use self::fuse_task::FuseTask;
pub use self::scope::Scope;
pub use self::state_cell::StateCell;
pub use self::stream_item::StreamItem;
