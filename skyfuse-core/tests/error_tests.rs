// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use skyfuse_core::FuseError;

#[derive(Debug, thiserror::Error)]
#[error("vendor said no")]
struct VendorError;

#[test]
fn test_display_includes_variant_prefix() {
    assert_eq!(
        FuseError::stream_error("location key missing").to_string(),
        "Stream processing error: location key missing"
    );
    assert_eq!(
        FuseError::user_error(VendorError).to_string(),
        "User error: vendor said no"
    );
}

#[test]
fn test_message_strips_variant_prefix() {
    assert_eq!(FuseError::stream_error("boom").message(), "boom");
    assert_eq!(FuseError::user_error(VendorError).message(), "vendor said no");
}

#[test]
fn test_user_error_keeps_its_source() {
    let err = FuseError::user_error(VendorError);
    let source = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("vendor said no"));
}

#[test]
fn test_clone_keeps_user_error_message() {
    let cloned = FuseError::user_error(VendorError).clone();
    assert!(matches!(cloned, FuseError::StreamProcessingError { .. }));
    assert_eq!(cloned.message(), "User error: vendor said no");
}
