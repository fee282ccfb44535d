// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! In-process stand-ins for the vendor SDK.
//!
//! Callbacks are always invoked with no internal lock held, so they may call
//! back into the simulation.

use crate::error::SdkError;
use crate::key::{DroneKey, KeyValue};
use crate::logging::debug;
use crate::service::{
    InitEvent, KeyCallback, KeyUpdate, KeyValueListenerService, ListenerId, RegistrationService,
    SdkManagerCallback,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

type Listeners = HashMap<DroneKey, Vec<(ListenerId, Arc<KeyCallback>)>>;

/// Key-value service backed by memory. Values are pushed with [`publish`](Self::publish).
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    listeners: Mutex<Listeners>,
    latest: Mutex<HashMap<DroneKey, KeyValue>>,
    listen_failures: Mutex<HashMap<DroneKey, SdkError>>,
    actions: Mutex<Vec<DroneKey>>,
    action_failure: Mutex<Option<SdkError>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `value` to every listener of `key`. Returns how many were reached.
    pub fn publish(&self, key: DroneKey, value: impl Into<KeyValue>) -> usize {
        let value = value.into();
        self.latest.lock().insert(key, value.clone());
        self.deliver(key, Ok(value))
    }

    /// Report a failure of `key` to every listener.
    pub fn fail(&self, key: DroneKey, error: SdkError) -> usize {
        self.deliver(key, Err(error))
    }

    /// Last value published under `key`.
    pub fn value(&self, key: DroneKey) -> Option<KeyValue> {
        self.latest.lock().get(&key).cloned()
    }

    pub fn listener_count(&self, key: DroneKey) -> usize {
        self.listeners.lock().get(&key).map_or(0, Vec::len)
    }

    pub fn total_listener_count(&self) -> usize {
        self.listeners.lock().values().map(Vec::len).sum()
    }

    /// Make future `listen` calls on `key` fail.
    pub fn reject_listen(&self, key: DroneKey, error: SdkError) {
        self.listen_failures.lock().insert(key, error);
    }

    /// Make every following action fail with `error`, or succeed again with `None`.
    pub fn set_action_failure(&self, error: Option<SdkError>) {
        *self.action_failure.lock() = error;
    }

    /// Actions performed so far, in order.
    pub fn actions(&self) -> Vec<DroneKey> {
        self.actions.lock().clone()
    }

    fn deliver(&self, key: DroneKey, update: KeyUpdate) -> usize {
        let callbacks: Vec<Arc<KeyCallback>> = self
            .listeners
            .lock()
            .get(&key)
            .map(|registered| registered.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default();

        for callback in &callbacks {
            callback(update.clone());
        }
        callbacks.len()
    }
}

#[async_trait]
impl KeyValueListenerService for InMemoryKeyValueStore {
    fn listen(
        &self,
        key: DroneKey,
        listener_id: ListenerId,
        callback: KeyCallback,
    ) -> Result<(), SdkError> {
        if let Some(error) = self.listen_failures.lock().get(&key) {
            return Err(error.clone());
        }

        debug!("store: {} listens to {}", listener_id, key);
        self.listeners
            .lock()
            .entry(key)
            .or_default()
            .push((listener_id, Arc::new(callback)));
        Ok(())
    }

    fn cancel_listen(&self, key: DroneKey, listener_id: ListenerId) {
        let mut listeners = self.listeners.lock();
        if let Some(registered) = listeners.get_mut(&key) {
            registered.retain(|(id, _)| *id != listener_id);
            if registered.is_empty() {
                listeners.remove(&key);
            }
        }
        debug!("store: {} stopped listening to {}", listener_id, key);
    }

    async fn perform_action(&self, key: DroneKey) -> Result<(), SdkError> {
        if !key.is_action() {
            return Err(SdkError::new(
                "INVALID_PARAM",
                format!("{key} is not an action key"),
            ));
        }

        self.actions.lock().push(key);
        match self.action_failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Calls received by [`SimulatedSdk`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SdkCall {
    Init,
    RegisterApp,
    Destroy,
}

/// Registration service that completes initialisation synchronously and
/// lets tests drive product connection events.
pub struct SimulatedSdk {
    callback: Mutex<Option<Arc<dyn SdkManagerCallback>>>,
    calls: Mutex<Vec<SdkCall>>,
    registration_failure: Mutex<Option<SdkError>>,
    sdk_version: String,
    build_version: String,
}

impl Default for SimulatedSdk {
    fn default() -> Self {
        Self::with_versions("5.9.0", "5.9.0-simulated")
    }
}

impl SimulatedSdk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(sdk_version: impl Into<String>, build_version: impl Into<String>) -> Self {
        Self {
            callback: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            registration_failure: Mutex::new(None),
            sdk_version: sdk_version.into(),
            build_version: build_version.into(),
        }
    }

    /// Make `register_app` report `error` instead of success.
    pub fn fail_registration(&self, error: SdkError) {
        *self.registration_failure.lock() = Some(error);
    }

    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.lock().clone()
    }

    pub fn is_initialised(&self) -> bool {
        self.callback.lock().is_some()
    }

    pub fn connect_product(&self, product_id: i32) {
        self.notify(|cb| cb.on_product_connect(product_id));
    }

    pub fn disconnect_product(&self, product_id: i32) {
        self.notify(|cb| cb.on_product_disconnect(product_id));
    }

    pub fn change_product(&self, product_id: i32) {
        self.notify(|cb| cb.on_product_changed(product_id));
    }

    pub fn download_progress(&self, current: u64, total: u64) {
        self.notify(|cb| cb.on_database_download_progress(current, total));
    }

    /// Invoke the registered callback, if any. Returns `false` before `init` or after `destroy`.
    fn notify(&self, f: impl FnOnce(&dyn SdkManagerCallback)) -> bool {
        let callback = self.callback.lock().clone();
        match callback {
            Some(callback) => {
                f(callback.as_ref());
                true
            }
            None => false,
        }
    }
}

impl RegistrationService for SimulatedSdk {
    fn init(&self, callback: Arc<dyn SdkManagerCallback>) {
        self.calls.lock().push(SdkCall::Init);
        *self.callback.lock() = Some(callback);
        self.notify(|cb| cb.on_init_process(InitEvent::StartToInitialize, 0));
        self.notify(|cb| cb.on_init_process(InitEvent::InitializeComplete, 100));
    }

    fn register_app(&self) {
        self.calls.lock().push(SdkCall::RegisterApp);
        let failure = self.registration_failure.lock().clone();
        match failure {
            Some(error) => self.notify(|cb| cb.on_register_failure(error)),
            None => self.notify(|cb| cb.on_register_success()),
        };
    }

    fn destroy(&self) {
        self.calls.lock().push(SdkCall::Destroy);
        self.callback.lock().take();
    }

    fn sdk_version(&self) -> String {
        self.sdk_version.clone()
    }

    fn build_version(&self) -> String {
        self.build_version.clone()
    }
}
