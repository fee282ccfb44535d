// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use skyfuse_drone::{
    Attitude, DroneKey, InMemoryKeyValueStore, InitEvent, KeyUpdate, KeyValue,
    KeyValueListenerService, ListenerId, RegistrationService, SdkCall, SdkError,
    SdkManagerCallback, SimulatedSdk,
};
use std::sync::Arc;

fn recording_listener(
    store: &InMemoryKeyValueStore,
    key: DroneKey,
) -> (ListenerId, Arc<Mutex<Vec<KeyUpdate>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let id = ListenerId::next();
    store
        .listen(key, id, Box::new(move |update| sink.lock().push(update)))
        .unwrap();
    (id, received)
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl SdkManagerCallback for Recorder {
    fn on_register_success(&self) {
        self.events.lock().push("registered".to_string());
    }

    fn on_register_failure(&self, error: SdkError) {
        self.events.lock().push(format!("failed {}", error.code));
    }

    fn on_product_connect(&self, product_id: i32) {
        self.events.lock().push(format!("connect {product_id}"));
    }

    fn on_product_disconnect(&self, product_id: i32) {
        self.events.lock().push(format!("disconnect {product_id}"));
    }

    fn on_product_changed(&self, product_id: i32) {
        self.events.lock().push(format!("changed {product_id}"));
    }

    fn on_init_process(&self, event: InitEvent, total_process: i32) {
        self.events.lock().push(format!("{event} {total_process}"));
    }

    fn on_database_download_progress(&self, current: u64, total: u64) {
        self.events.lock().push(format!("download {current}/{total}"));
    }
}

#[test]
fn publish_reaches_only_listeners_of_the_key() {
    // Arrange
    let store = InMemoryKeyValueStore::new();
    let (_, gimbal) = recording_listener(&store, DroneKey::GimbalAttitude);
    let (_, aircraft) = recording_listener(&store, DroneKey::AircraftAttitude);

    // Act
    let reached = store.publish(DroneKey::GimbalAttitude, Attitude::new(1.0, 2.0, 3.0));

    // Assert
    assert_eq!(reached, 1);
    assert_eq!(
        gimbal.lock().as_slice(),
        &[Ok(KeyValue::Attitude(Attitude::new(1.0, 2.0, 3.0)))]
    );
    assert!(aircraft.lock().is_empty());
    assert_eq!(
        store.value(DroneKey::GimbalAttitude),
        Some(KeyValue::Attitude(Attitude::new(1.0, 2.0, 3.0)))
    );
}

#[test]
fn publish_without_listeners_still_records_the_value() {
    let store = InMemoryKeyValueStore::new();

    let reached = store.publish(DroneKey::HomeLocation, KeyValue::Empty);

    assert_eq!(reached, 0);
    assert_eq!(store.value(DroneKey::HomeLocation), Some(KeyValue::Empty));
}

#[test]
fn fail_delivers_the_error_without_changing_the_value() {
    // Arrange
    let store = InMemoryKeyValueStore::new();
    let (_, received) = recording_listener(&store, DroneKey::AircraftLocation3D);
    let error = SdkError::new("TIMEOUT", "Request timed out");

    // Act
    store.fail(DroneKey::AircraftLocation3D, error.clone());

    // Assert
    assert_eq!(received.lock().as_slice(), &[Err(error)]);
    assert_eq!(store.value(DroneKey::AircraftLocation3D), None);
}

#[test]
fn cancel_listen_removes_only_that_listener() {
    // Arrange
    let store = InMemoryKeyValueStore::new();
    let (first, first_received) = recording_listener(&store, DroneKey::GimbalAttitude);
    let (_, second_received) = recording_listener(&store, DroneKey::GimbalAttitude);
    assert_eq!(store.listener_count(DroneKey::GimbalAttitude), 2);

    // Act
    store.cancel_listen(DroneKey::GimbalAttitude, first);
    store.cancel_listen(DroneKey::GimbalAttitude, first);
    store.publish(DroneKey::GimbalAttitude, Attitude::new(0.0, 0.0, 1.0));

    // Assert
    assert_eq!(store.listener_count(DroneKey::GimbalAttitude), 1);
    assert_eq!(store.total_listener_count(), 1);
    assert!(first_received.lock().is_empty());
    assert_eq!(second_received.lock().len(), 1);
}

#[test]
fn rejected_key_refuses_listeners() {
    let store = InMemoryKeyValueStore::new();
    let error = SdkError::new("NOT_SUPPORTED", "Key not supported");
    store.reject_listen(DroneKey::HomeLocation, error.clone());

    let result = store.listen(DroneKey::HomeLocation, ListenerId::next(), Box::new(|_| {}));

    assert_eq!(result, Err(error));
    assert_eq!(store.total_listener_count(), 0);
}

#[tokio::test]
async fn actions_are_logged_and_can_fail() {
    // Arrange
    let store = InMemoryKeyValueStore::new();

    // Act
    let first = store.perform_action(DroneKey::GimbalCalibrate).await;
    store.set_action_failure(Some(SdkError::new("BUSY", "Gimbal busy")));
    let second = store.perform_action(DroneKey::GimbalCalibrate).await;
    let not_an_action = store.perform_action(DroneKey::GimbalAttitude).await;

    // Assert
    assert!(first.is_ok());
    assert_eq!(second.unwrap_err().code, "BUSY");
    assert_eq!(not_an_action.unwrap_err().code, "INVALID_PARAM");
    assert_eq!(
        store.actions(),
        vec![DroneKey::GimbalCalibrate, DroneKey::GimbalCalibrate]
    );
}

#[test]
fn init_runs_the_start_up_sequence_synchronously() {
    // Arrange
    let sdk = SimulatedSdk::new();
    let recorder = Arc::new(Recorder::default());

    // Act
    sdk.init(recorder.clone());

    // Assert
    assert!(sdk.is_initialised());
    assert_eq!(sdk.calls(), vec![SdkCall::Init]);
    assert_eq!(
        recorder.events.lock().as_slice(),
        &["START_TO_INITIALIZE 0", "INITIALIZE_COMPLETE 100"]
    );
}

#[test]
fn register_app_reports_success_or_configured_failure() {
    // Arrange
    let sdk = SimulatedSdk::new();
    let recorder = Arc::new(Recorder::default());
    sdk.init(recorder.clone());
    recorder.events.lock().clear();

    // Act
    sdk.register_app();
    sdk.fail_registration(SdkError::new("INVALID_APP_KEY", "App key invalid"));
    sdk.register_app();

    // Assert
    assert_eq!(
        recorder.events.lock().as_slice(),
        &["registered", "failed INVALID_APP_KEY"]
    );
    assert_eq!(
        sdk.calls(),
        vec![SdkCall::Init, SdkCall::RegisterApp, SdkCall::RegisterApp]
    );
}

#[test]
fn product_events_are_forwarded_until_destroy() {
    // Arrange
    let sdk = SimulatedSdk::with_versions("5.10.0", "5.10.0-test");
    let recorder = Arc::new(Recorder::default());

    // Act
    sdk.connect_product(7);
    sdk.init(recorder.clone());
    recorder.events.lock().clear();
    sdk.connect_product(1);
    sdk.change_product(2);
    sdk.download_progress(50, 100);
    sdk.disconnect_product(2);
    sdk.destroy();
    sdk.connect_product(3);

    // Assert
    assert!(!sdk.is_initialised());
    assert_eq!(
        recorder.events.lock().as_slice(),
        &["connect 1", "changed 2", "download 50/100", "disconnect 2"]
    );
    assert_eq!(sdk.sdk_version(), "5.10.0");
    assert_eq!(sdk.build_version(), "5.10.0-test");
}
