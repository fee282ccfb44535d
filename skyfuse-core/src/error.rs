// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The failure value carried by [`StreamItem::Error`](crate::StreamItem::Error).
//!
//! A source failure reaches the consumer as the very `FuseError` the source
//! yielded. Cancellation is not an error: a cancelled sequence just ends.
//!
//! ```
//! use skyfuse_core::{FuseError, Result};
//!
//! fn read_attitude() -> Result<()> {
//!     Err(FuseError::stream_error("attitude key not ready"))
//! }
//!
//! let error = read_attitude().unwrap_err();
//! assert_eq!(error.message(), "attitude key not ready");
//! ```

use std::error::Error;

#[derive(Debug, thiserror::Error)]
pub enum FuseError {
    /// A failure described by text only, e.g. a source that lost its signal.
    #[error("Stream processing error: {context}")]
    StreamProcessingError { context: String },

    /// A typed error from a handler or from the vendor layer.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn Error + Send + Sync>),
}

impl FuseError {
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    pub fn user_error(error: impl Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// The text a status line shows: no variant prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::StreamProcessingError { context } => context.clone(),
            Self::UserError(inner) => inner.to_string(),
        }
    }
}

/// A cloned user error keeps its text but loses its type.
impl Clone for FuseError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::stream_error(context.clone()),
            Self::UserError(inner) => Self::stream_error(format!("User error: {inner}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, FuseError>;
