// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Text rendering of fused telemetry for a status display.

use crate::telemetry::{Attitude, LocationCoordinate2D, LocationCoordinate3D, TelemetrySnapshot};
use skyfuse_core::FuseError;

/// Precision and fixed texts used by [`TelemetryStatus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusFormat {
    pub lat_long_precision: usize,
    pub altitude_precision: usize,
    pub attitude_precision: usize,
    /// Shown in place of a value that has not been reported yet.
    pub placeholder: String,
    /// Shown before the first snapshot arrives.
    pub awaiting_text: String,
    /// Shown for an error without a message.
    pub error_fallback: String,
}

impl Default for StatusFormat {
    fn default() -> Self {
        Self {
            lat_long_precision: 6,
            altitude_precision: 2,
            attitude_precision: 2,
            placeholder: "?".to_string(),
            awaiting_text: "Awaiting Location...".to_string(),
            error_fallback: "Error updating status".to_string(),
        }
    }
}

/// Renders telemetry snapshots as four status lines.
///
/// ```
/// use skyfuse_drone::{Attitude, LocationCoordinate3D, TelemetryStatus};
///
/// let status = TelemetryStatus::default();
/// let text = status.render(&(
///     Some(LocationCoordinate3D::new(47.397742, 8.545594, 12.5)),
///     Some(Attitude::new(1.0, -2.5, 90.0)),
///     None,
///     None,
/// ));
///
/// assert_eq!(
///     text,
///     "Lat: 47.397742, Lon: 8.545594, Alt: 12.50\n\
///      Aircraft: Pitch: 1.00, Roll: -2.50, Yaw: 90.00\n\
///      Gimbal: Pitch: ?, Roll: ?, Yaw: ?\n\
///      Home: Lat: ?, Lon: ?"
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct TelemetryStatus {
    format: StatusFormat,
}

impl TelemetryStatus {
    pub fn new(format: StatusFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &StatusFormat {
        &self.format
    }

    pub fn awaiting(&self) -> &str {
        &self.format.awaiting_text
    }

    pub fn render(&self, snapshot: &TelemetrySnapshot) -> String {
        let (location, aircraft, gimbal, home) = snapshot;
        format!(
            "{}\n{}\n{}\n{}",
            self.location_line(location.as_ref()),
            self.attitude_line("Aircraft", aircraft.as_ref()),
            self.attitude_line("Gimbal", gimbal.as_ref()),
            self.home_line(home.as_ref()),
        )
    }

    /// The error's message, or the fallback text when it has none.
    pub fn render_error(&self, error: &FuseError) -> String {
        let message = error.message();
        if message.trim().is_empty() {
            self.format.error_fallback.clone()
        } else {
            message
        }
    }

    fn location_line(&self, location: Option<&LocationCoordinate3D>) -> String {
        format!(
            "Lat: {}, Lon: {}, Alt: {}",
            self.lat_long(location.map(|l| l.latitude)),
            self.lat_long(location.map(|l| l.longitude)),
            self.fixed(location.map(|l| l.altitude), self.format.altitude_precision),
        )
    }

    fn attitude_line(&self, label: &str, attitude: Option<&Attitude>) -> String {
        let precision = self.format.attitude_precision;
        format!(
            "{label}: Pitch: {}, Roll: {}, Yaw: {}",
            self.fixed(attitude.map(|a| a.pitch), precision),
            self.fixed(attitude.map(|a| a.roll), precision),
            self.fixed(attitude.map(|a| a.yaw), precision),
        )
    }

    fn home_line(&self, home: Option<&LocationCoordinate2D>) -> String {
        format!(
            "Home: Lat: {}, Lon: {}",
            self.lat_long(home.map(|h| h.latitude)),
            self.lat_long(home.map(|h| h.longitude)),
        )
    }

    fn lat_long(&self, value: Option<f64>) -> String {
        self.fixed(value, self.format.lat_long_precision)
    }

    fn fixed(&self, value: Option<f64>, precision: usize) -> String {
        match value {
            Some(value) => format!("{value:.precision$}"),
            None => self.format.placeholder.clone(),
        }
    }
}
