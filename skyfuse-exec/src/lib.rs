// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Consumers for `StreamItem` sequences.
//!
//! - [`SubscribeExt::subscribe`] runs a handler for every value, one at a time
//! - [`SubscribeLatestExt::subscribe_latest`] runs a handler for the newest
//!   value only, abandoning the previous handler when a newer value arrives

mod logging;
pub mod subscribe;
pub mod subscribe_latest;

pub use subscribe::SubscribeExt;
pub use subscribe_latest::SubscribeLatestExt;
