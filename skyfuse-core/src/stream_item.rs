// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::FuseError;

/// What every source and combined sequence yields.
///
/// A failure travels in-band as `Error` and is the last item of its sequence.
#[derive(Debug, Clone)]
pub enum StreamItem<T> {
    Value(T),
    Error(FuseError),
}

/// Values compare by content. Two errors are never equal.
impl<T: PartialEq> PartialEq for StreamItem<T> {
    fn eq(&self, other: &Self) -> bool {
        matches!((self, other), (Self::Value(a), Self::Value(b)) if a == b)
    }
}

impl<T> StreamItem<T> {
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Transform the value; an error passes through as is.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StreamItem<U> {
        match self {
            Self::Value(value) => StreamItem::Value(f(value)),
            Self::Error(error) => StreamItem::Error(error),
        }
    }
}
