// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Typed access to the aircraft's telemetry keys.
//!
//! ```
//! use skyfuse_drone::{DroneAccessor, DroneKey, InMemoryKeyValueStore, LocationCoordinate3D};
//! use skyfuse_core::{Scope, StreamItem};
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = Arc::new(InMemoryKeyValueStore::new());
//! let accessor = DroneAccessor::new(store.clone());
//! let scope = Scope::new();
//!
//! let mut telemetry = accessor.telemetry(&scope);
//! let first = telemetry.next();
//!
//! // Listeners register once the fused sequence is polled
//! let publisher = async {
//!     while store.listener_count(DroneKey::AircraftLocation3D) == 0 {
//!         tokio::task::yield_now().await;
//!     }
//!     store.publish(DroneKey::AircraftLocation3D, LocationCoordinate3D::new(47.0, 8.0, 30.0));
//! };
//! let (item, ()) = futures::join!(first, publisher);
//!
//! match item {
//!     Some(StreamItem::Value((location, aircraft, gimbal, home))) => {
//!         assert_eq!(location.map(|l| l.altitude), Some(30.0));
//!         assert!(aircraft.is_none() && gimbal.is_none() && home.is_none());
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! # }
//! ```

use crate::error::SdkError;
use crate::key::{DroneKey, FromKeyValue, KeyValue};
use crate::key_source::KeySource;
use crate::logging::{info, warn};
use crate::service::KeyValueListenerService;
use crate::telemetry::{
    Attitude, Location, LocationCoordinate2D, LocationCoordinate3D, LocationError,
    TelemetrySnapshot,
};
use futures::{Stream, StreamExt};
use skyfuse_core::{Scope, StreamItem};
use skyfuse_stream::{combine_nullable4, CombineNullable};
use std::sync::Arc;

#[derive(Clone)]
pub struct DroneAccessor {
    service: Arc<dyn KeyValueListenerService>,
}

impl DroneAccessor {
    pub fn new(service: Arc<dyn KeyValueListenerService>) -> Self {
        Self { service }
    }

    /// Values of `key` decoded as `T`. Nothing is registered until the first poll.
    pub fn subscribe<T: FromKeyValue>(&self, key: DroneKey) -> KeySource<T> {
        KeySource::new(Arc::clone(&self.service), key)
    }

    /// Latitude and longitude in degrees, altitude in metres above the home point.
    pub fn aircraft_location(&self) -> KeySource<LocationCoordinate3D> {
        self.subscribe(DroneKey::AircraftLocation3D)
    }

    pub fn aircraft_attitude(&self) -> KeySource<Attitude> {
        self.subscribe(DroneKey::AircraftAttitude)
    }

    /// Gimbal yaw has an arbitrary offset until [`recalibrate_gimbal`](Self::recalibrate_gimbal) ran.
    pub fn gimbal_attitude(&self) -> KeySource<Attitude> {
        self.subscribe(DroneKey::GimbalAttitude)
    }

    pub fn home_point(&self) -> KeySource<LocationCoordinate2D> {
        self.subscribe(DroneKey::HomeLocation)
    }

    pub async fn recalibrate_gimbal(&self) -> Result<(), SdkError> {
        match self.service.perform_action(DroneKey::GimbalCalibrate).await {
            Ok(()) => {
                info!("Gimbal yaw recalibration started");
                Ok(())
            }
            Err(error) => {
                warn!("Gimbal yaw recalibration failed: {}", error.description());
                Err(error)
            }
        }
    }

    /// Aircraft location, aircraft attitude, gimbal attitude and home point fused
    /// into one snapshot per update.
    pub fn telemetry(&self, scope: &Scope) -> CombineNullable<TelemetrySnapshot> {
        combine_nullable4(
            scope,
            self.aircraft_location(),
            self.aircraft_attitude(),
            self.gimbal_attitude(),
            self.home_point(),
        )
    }

    /// The 2D aircraft location checked against the coordinate ranges.
    ///
    /// Every update yields `Ok(Location)` or `Err(LocationError::Unavailable)`,
    /// including updates that are not a 2D coordinate at all.
    pub fn validated_location(
        &self,
    ) -> impl Stream<Item = StreamItem<Result<Location, LocationError>>> + Send + Unpin + 'static
    {
        self.subscribe::<KeyValue>(DroneKey::AircraftLocation)
            .map(|item| item.map(validate_location))
    }
}

fn validate_location(value: KeyValue) -> Result<Location, LocationError> {
    match LocationCoordinate2D::from_key_value(value) {
        Some(coordinate) => Location::try_from(coordinate),
        None => Err(LocationError::Unavailable),
    }
}

impl core::fmt::Debug for DroneAccessor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DroneAccessor").finish_non_exhaustive()
    }
}
