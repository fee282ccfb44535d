// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Vendor key identifiers and the untyped values published under them.

use crate::telemetry::{Attitude, LocationCoordinate2D, LocationCoordinate3D};
use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DroneKey {
    AircraftLocation3D,
    AircraftLocation,
    AircraftAttitude,
    GimbalAttitude,
    HomeLocation,
    ProductType,
    /// Action key: starts the gimbal yaw recalibration.
    GimbalCalibrate,
}

impl DroneKey {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AircraftLocation3D => "KeyAircraftLocation3D",
            Self::AircraftLocation => "KeyAircraftLocation",
            Self::AircraftAttitude => "KeyAircraftAttitude",
            Self::GimbalAttitude => "KeyGimbalAttitude",
            Self::HomeLocation => "KeyHomeLocation",
            Self::ProductType => "KeyProductType",
            Self::GimbalCalibrate => "KeyGimbalCalibrate",
        }
    }

    /// Keys that trigger an action rather than publish values.
    pub fn is_action(&self) -> bool {
        matches!(self, Self::GimbalCalibrate)
    }
}

impl fmt::Display for DroneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProductType {
    DjiMini3,
    DjiMini3Pro,
    DjiMavic3Enterprise,
    M30Series,
    M350Rtk,
    Unrecognized,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DjiMini3 => "DJI_MINI_3",
            Self::DjiMini3Pro => "DJI_MINI_3_PRO",
            Self::DjiMavic3Enterprise => "DJI_MAVIC_3_ENTERPRISE_SERIES",
            Self::M30Series => "M30_SERIES",
            Self::M350Rtk => "M350_RTK",
            Self::Unrecognized => "UNRECOGNIZED",
        };
        f.write_str(name)
    }
}

/// A value as published by the key-value service, before decoding.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyValue {
    Location3D(LocationCoordinate3D),
    Location2D(LocationCoordinate2D),
    Attitude(Attitude),
    Product(ProductType),
    Empty,
}

impl KeyValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Location3D(_) => "LocationCoordinate3D",
            Self::Location2D(_) => "LocationCoordinate2D",
            Self::Attitude(_) => "Attitude",
            Self::Product(_) => "ProductType",
            Self::Empty => "Empty",
        }
    }
}

/// Typed view of a [`KeyValue`].
pub trait FromKeyValue: Sized {
    /// Name used in decode errors.
    const EXPECTED: &'static str;

    fn from_key_value(value: KeyValue) -> Option<Self>;
}

macro_rules! impl_from_key_value {
    ($ty:ty, $variant:ident, $expected:literal) => {
        impl FromKeyValue for $ty {
            const EXPECTED: &'static str = $expected;

            fn from_key_value(value: KeyValue) -> Option<Self> {
                match value {
                    KeyValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_from_key_value!(LocationCoordinate3D, Location3D, "LocationCoordinate3D");
impl_from_key_value!(LocationCoordinate2D, Location2D, "LocationCoordinate2D");
impl_from_key_value!(Attitude, Attitude, "Attitude");
impl_from_key_value!(ProductType, Product, "ProductType");

impl FromKeyValue for KeyValue {
    const EXPECTED: &'static str = "any value";

    fn from_key_value(value: KeyValue) -> Option<Self> {
        Some(value)
    }
}

impl From<LocationCoordinate3D> for KeyValue {
    fn from(value: LocationCoordinate3D) -> Self {
        Self::Location3D(value)
    }
}

impl From<LocationCoordinate2D> for KeyValue {
    fn from(value: LocationCoordinate2D) -> Self {
        Self::Location2D(value)
    }
}

impl From<Attitude> for KeyValue {
    fn from(value: Attitude) -> Self {
        Self::Attitude(value)
    }
}

impl From<ProductType> for KeyValue {
    fn from(value: ProductType) -> Self {
        Self::Product(value)
    }
}
