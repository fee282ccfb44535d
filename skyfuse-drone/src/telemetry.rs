// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Telemetry value types reported by the aircraft.

use thiserror::Error;

/// Aircraft position. `altitude` is in metres above the home point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocationCoordinate3D {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl LocationCoordinate3D {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocationCoordinate2D {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationCoordinate2D {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both coordinates inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        check_latitude(self.latitude) && check_longitude(self.longitude)
    }
}

/// Orientation in degrees.
///
/// - `pitch`: up from horizontal
/// - `roll`: right from vertical
/// - `yaw`: clockwise from North
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attitude {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

impl Attitude {
    pub fn new(pitch: f64, roll: f64, yaw: f64) -> Self {
        Self { pitch, roll, yaw }
    }
}

/// A checked aircraft position, see [`Location::try_from`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location Unavailable")]
    Unavailable,
}

impl TryFrom<LocationCoordinate2D> for Location {
    type Error = LocationError;

    fn try_from(coordinate: LocationCoordinate2D) -> Result<Self, Self::Error> {
        if coordinate.is_valid() {
            Ok(Self {
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
            })
        } else {
            Err(LocationError::Unavailable)
        }
    }
}

/// `true` for latitudes in [-90, 90]. NaN is rejected.
pub fn check_latitude(latitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude)
}

/// `true` for longitudes in [-180, 180]. NaN is rejected.
pub fn check_longitude(longitude: f64) -> bool {
    (-180.0..=180.0).contains(&longitude)
}

/// One fused telemetry reading: aircraft position, aircraft attitude,
/// gimbal attitude and home point, each absent until first reported.
pub type TelemetrySnapshot = (
    Option<LocationCoordinate3D>,
    Option<Attitude>,
    Option<Attitude>,
    Option<LocationCoordinate2D>,
);
