// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::key::DroneKey;
use thiserror::Error;

/// Error reported by the vendor SDK.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{description} (code {code})")]
pub struct SdkError {
    pub code: String,
    pub description: String,
}

impl SdkError {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Failures of the key-value layer as seen by a subscriber.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DroneError {
    #[error("Unexpected value for {key}: expected {expected}")]
    Decode { key: DroneKey, expected: &'static str },

    #[error("Listening to {key} failed: {source}")]
    Listen { key: DroneKey, source: SdkError },

    #[error("Action {key} failed: {source}")]
    Action { key: DroneKey, source: SdkError },
}
