// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Capabilities the vendor SDK has to provide.
//!
//! Everything above this module talks to the SDK only through these traits,
//! so a simulated SDK can stand in for the real one.

use crate::error::SdkError;
use crate::key::{DroneKey, KeyValue};
use async_trait::async_trait;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one registration on a key. Unique per process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// What a key listener receives: a new value or a failure of the key.
pub type KeyUpdate = Result<KeyValue, SdkError>;

/// Invoked by the service on every update of a listened key, from any thread.
pub type KeyCallback = Box<dyn Fn(KeyUpdate) + Send + Sync>;

#[async_trait]
pub trait KeyValueListenerService: Send + Sync {
    /// Start delivering updates of `key` to `callback` under `listener_id`.
    fn listen(
        &self,
        key: DroneKey,
        listener_id: ListenerId,
        callback: KeyCallback,
    ) -> Result<(), SdkError>;

    /// Stop delivering to `listener_id`. Unknown ids are ignored.
    fn cancel_listen(&self, key: DroneKey, listener_id: ListenerId);

    async fn perform_action(&self, key: DroneKey) -> Result<(), SdkError>;
}

/// Steps of the SDK start-up sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InitEvent {
    StartToInitialize,
    InitializeComplete,
}

impl InitEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartToInitialize => "START_TO_INITIALIZE",
            Self::InitializeComplete => "INITIALIZE_COMPLETE",
        }
    }
}

impl fmt::Display for InitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SDK lifecycle notifications. Called from SDK threads.
pub trait SdkManagerCallback: Send + Sync {
    fn on_register_success(&self);
    fn on_register_failure(&self, error: SdkError);
    fn on_product_connect(&self, product_id: i32);
    fn on_product_disconnect(&self, product_id: i32);
    fn on_product_changed(&self, product_id: i32);
    fn on_init_process(&self, event: InitEvent, total_process: i32);
    fn on_database_download_progress(&self, current: u64, total: u64);
}

/// SDK initialisation and app registration.
pub trait RegistrationService: Send + Sync {
    /// Start the SDK. The service keeps `callback` until [`destroy`](Self::destroy).
    fn init(&self, callback: Arc<dyn SdkManagerCallback>);

    fn register_app(&self);

    fn destroy(&self);

    fn sdk_version(&self) -> String;

    fn build_version(&self) -> String;
}
