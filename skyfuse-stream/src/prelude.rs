// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Commonly used traits and types.
//!
//! ```
//! use skyfuse_stream::prelude::*;
//! ```

pub use crate::combine_nullable::{
    combine_nullable2, combine_nullable3, combine_nullable4, combine_nullable_all,
    CombineNullable, CombineNullableExt,
};
pub use crate::into_source::IntoSourceExt;
pub use crate::snapshot::{Slots, Snapshot};
pub use skyfuse_core::{FuseError, Scope, StreamItem};
