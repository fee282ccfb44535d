// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Non-poisoning mutex used for all shared fusion state.

pub use parking_lot::{Mutex, MutexGuard};
