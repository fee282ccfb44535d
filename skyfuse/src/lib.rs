// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Skyfuse
//!
//! Fuses independent telemetry streams into one stream of snapshots where
//! every slot holds the latest value of its source, or `None` until that
//! source has reported.
//!
//! ## Overview
//!
//! - `skyfuse-core`: [`StreamItem`], [`FuseError`], [`Scope`] and [`StateCell`]
//! - `skyfuse-stream`: the [`CombineNullable`] combinator and its constructors
//! - `skyfuse-exec`: `subscribe` and collect-latest `subscribe_latest`
//! - `skyfuse-drone`: key streams, SDK lifecycle and status rendering
//!
//! Nothing runs until the combined stream is first polled. Cancelling it
//! (or its [`Scope`]) stops every source listener.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skyfuse::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(InMemoryKeyValueStore::new());
//!     let accessor = DroneAccessor::new(store.clone());
//!     let status = TelemetryStatus::default();
//!
//!     let scope = Scope::new();
//!     let telemetry = accessor.telemetry(&scope);
//!     let handle = telemetry.cancel_handle();
//!
//!     let task = tokio::spawn(telemetry.subscribe_latest(
//!         move |snapshot, _| {
//!             let text = status.render(&snapshot);
//!             async move {
//!                 println!("{text}");
//!                 Ok::<(), FuseError>(())
//!             }
//!         },
//!         |error| eprintln!("{error}"),
//!         None,
//!     ));
//!
//!     store.publish(DroneKey::GimbalAttitude, Attitude::new(0.0, 0.0, 90.0));
//!
//!     handle.cancel();
//!     let _ = task.await;
//! }
//! ```

pub use skyfuse_core::{CancellationToken, FuseError, FuseTask, Scope, StateCell, StreamItem};
pub use skyfuse_drone::{DroneAccessor, TelemetrySnapshot, TelemetryStatus};
pub use skyfuse_stream::{CancelHandle, CombineNullable, CombineNullableExt};

/// Prelude module for convenient imports
pub mod prelude {
    pub use skyfuse_core::{CancellationToken, FuseError, Scope, StateCell, StreamItem};
    pub use skyfuse_drone::{
        Attitude, DroneAccessor, DroneKey, InMemoryKeyValueStore, LocationCoordinate2D,
        LocationCoordinate3D, SdkManager, SimulatedSdk, TelemetrySnapshot, TelemetryStatus,
    };
    pub use skyfuse_exec::{SubscribeExt, SubscribeLatestExt};
    pub use skyfuse_stream::prelude::*;
}
