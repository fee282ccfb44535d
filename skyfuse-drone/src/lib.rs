// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Drone telemetry and SDK lifecycle on top of skyfuse streams.
//!
//! The vendor SDK is reached only through the capability traits in
//! [`service`]. [`DroneAccessor`] turns telemetry keys into sources and fuses
//! them, [`SdkManager`] exposes registration and connection state as
//! [`StateCell`](skyfuse_core::StateCell)s, and [`TelemetryStatus`] renders
//! fused snapshots for display. The [`simulated`] module provides in-memory
//! implementations of every capability.

mod logging;

pub mod accessor;
pub mod error;
pub mod key;
pub mod key_source;
pub mod sdk_manager;
pub mod service;
pub mod simulated;
pub mod status;
pub mod telemetry;

pub use accessor::DroneAccessor;
pub use error::{DroneError, SdkError};
pub use key::{DroneKey, FromKeyValue, KeyValue, ProductType};
pub use key_source::KeySource;
pub use sdk_manager::{
    ConnectionState, DroneSdkInfo, RegistrationState, SdkEvent, SdkManager,
};
pub use service::{
    InitEvent, KeyCallback, KeyUpdate, KeyValueListenerService, ListenerId, RegistrationService,
    SdkManagerCallback,
};
pub use simulated::{InMemoryKeyValueStore, SdkCall, SimulatedSdk};
pub use status::{StatusFormat, TelemetryStatus};
pub use telemetry::{
    check_latitude, check_longitude, Attitude, Location, LocationCoordinate2D,
    LocationCoordinate3D, LocationError, TelemetrySnapshot,
};
