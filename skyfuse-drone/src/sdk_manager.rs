// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! SDK lifecycle state: registration, product connection and notifications.
//!
//! [`SdkManager`] turns the callbacks of a [`RegistrationService`] into
//! [`StateCell`]s that any number of observers can subscribe to.

use crate::error::SdkError;
use crate::key::ProductType;
use crate::logging::{debug, info, warn};
use crate::service::{InitEvent, RegistrationService, SdkManagerCallback};
use core::fmt;
use futures::future::{select, Either};
use futures::{Stream, StreamExt};
use skyfuse_core::{FuseTask, StateCell, StreamItem};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrationState {
    Registered,
    Failed(SdkError),
}

impl RegistrationState {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered)
    }

    pub fn status_text(&self) -> String {
        match self {
            Self::Registered => "Registration Successful".to_string(),
            Self::Failed(error) => format!("Registration Failed - {}", error.description()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Connected { product_id: i32 },
    Disconnected { product_id: i32 },
    Changed { product_id: i32 },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        !matches!(self, Self::Disconnected { .. })
    }

    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "Product Connected",
            Self::Disconnected { .. } => "Product Disconnected",
            Self::Changed { .. } => "Product Changed",
        }
    }
}

/// Every SDK notification, rendered as the user-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SdkEvent {
    RegisterSuccess,
    RegisterFailure(SdkError),
    ProductConnection { product_id: i32, connected: bool },
    ProductChanged { product_id: i32 },
    InitProcess { event: InitEvent, total_process: i32 },
    DatabaseDownloadProgress { current: u64, total: u64 },
}

impl fmt::Display for SdkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegisterSuccess => f.write_str("Register Success"),
            Self::RegisterFailure(error) => write!(f, "Register Failure: {error}"),
            Self::ProductConnection {
                product_id,
                connected,
            } => write!(f, "Product: {product_id}, ConnectionState: {connected}"),
            Self::ProductChanged { product_id } => write!(f, "Product: {product_id} Changed"),
            Self::InitProcess { event, .. } => write!(f, "Init Process event: {}", event.name()),
            Self::DatabaseDownloadProgress { current, total } => {
                write!(f, "Database Download Progress: {current}/{total}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroneSdkInfo {
    pub sdk_version: String,
    pub build_version: String,
    /// Last product reported while connected, `None` after a disconnect.
    pub product_type: Option<String>,
}

#[derive(Clone, Default)]
struct Cells {
    registration: StateCell<RegistrationState>,
    connection: StateCell<ConnectionState>,
    last_event: StateCell<SdkEvent>,
    product_type: StateCell<ProductType>,
}

struct Callbacks {
    cells: Cells,
    service: Arc<dyn RegistrationService>,
}

impl Callbacks {
    fn emit(&self, event: SdkEvent) {
        info!("sdk: {}", event);
        self.cells.last_event.set(event);
    }
}

impl SdkManagerCallback for Callbacks {
    fn on_register_success(&self) {
        self.cells.registration.set(RegistrationState::Registered);
        self.emit(SdkEvent::RegisterSuccess);
    }

    fn on_register_failure(&self, error: SdkError) {
        warn!("sdk: registration failed: {}", error);
        self.cells
            .registration
            .set(RegistrationState::Failed(error.clone()));
        self.emit(SdkEvent::RegisterFailure(error));
    }

    fn on_product_connect(&self, product_id: i32) {
        self.cells
            .connection
            .set(ConnectionState::Connected { product_id });
        self.emit(SdkEvent::ProductConnection {
            product_id,
            connected: true,
        });
    }

    fn on_product_disconnect(&self, product_id: i32) {
        self.cells
            .connection
            .set(ConnectionState::Disconnected { product_id });
        self.cells.product_type.clear();
        self.emit(SdkEvent::ProductConnection {
            product_id,
            connected: false,
        });
    }

    fn on_product_changed(&self, product_id: i32) {
        self.cells
            .connection
            .set(ConnectionState::Changed { product_id });
        self.emit(SdkEvent::ProductChanged { product_id });
    }

    fn on_init_process(&self, event: InitEvent, total_process: i32) {
        self.emit(SdkEvent::InitProcess {
            event,
            total_process,
        });
        if event == InitEvent::InitializeComplete {
            debug!("sdk: initialisation complete, registering app");
            self.service.register_app();
        }
    }

    fn on_database_download_progress(&self, current: u64, total: u64) {
        self.emit(SdkEvent::DatabaseDownloadProgress { current, total });
    }
}

/// Observable SDK lifecycle on top of a [`RegistrationService`].
pub struct SdkManager {
    service: Arc<dyn RegistrationService>,
    cells: Cells,
}

impl SdkManager {
    pub fn new(service: Arc<dyn RegistrationService>) -> Self {
        Self {
            service,
            cells: Cells::default(),
        }
    }

    /// Hand the callbacks to the service and start the SDK.
    ///
    /// The app is registered automatically once the service reports
    /// [`InitEvent::InitializeComplete`].
    pub fn init(&self) {
        info!("sdk: initialising");
        let callbacks = Callbacks {
            cells: self.cells.clone(),
            service: Arc::clone(&self.service),
        };
        self.service.init(Arc::new(callbacks));
    }

    pub fn destroy(&self) {
        info!("sdk: destroying");
        self.service.destroy();
    }

    pub fn registration(&self) -> &StateCell<RegistrationState> {
        &self.cells.registration
    }

    pub fn connection(&self) -> &StateCell<ConnectionState> {
        &self.cells.connection
    }

    pub fn last_event(&self) -> &StateCell<SdkEvent> {
        &self.cells.last_event
    }

    pub fn product_type(&self) -> &StateCell<ProductType> {
        &self.cells.product_type
    }

    /// Keep [`product_type`](Self::product_type) current from `source`
    /// until the returned task is dropped or `source` ends.
    ///
    /// Errors from `source` are logged and skipped.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn watch_product_type<S>(&self, source: S) -> FuseTask
    where
        S: Stream<Item = StreamItem<ProductType>> + Send + 'static,
    {
        let cell = self.cells.product_type.clone();
        FuseTask::spawn(move |cancel| async move {
            let mut source = Box::pin(source);
            loop {
                match select(source.next(), cancel.cancelled()).await {
                    Either::Left((Some(StreamItem::Value(product)), _)) => {
                        debug!("sdk: product type {}", product);
                        cell.set(product);
                    }
                    Either::Left((Some(StreamItem::Error(error)), _)) => {
                        warn!("sdk: product type unavailable: {}", error);
                    }
                    Either::Left((None, _)) | Either::Right(_) => break,
                }
            }
        })
    }

    pub fn drone_sdk_info(&self) -> DroneSdkInfo {
        DroneSdkInfo {
            sdk_version: self.service.sdk_version(),
            build_version: self.service.build_version(),
            product_type: self.cells.product_type.get().map(|p| p.to_string()),
        }
    }
}

impl fmt::Debug for SdkManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkManager")
            .field("registration", &self.cells.registration.get())
            .field("connection", &self.cells.connection.get())
            .finish_non_exhaustive()
    }
}
