// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn missing_token_carries_hint() {
    let msg = Error::MissingToken.to_string();
    assert!(msg.contains("--token"));
    assert!(msg.contains("FITTRACK_TOKEN"));
}

#[test]
fn component_errors_display_unchanged() {
    let api = ApiError::Rejected { status: 400, message: "Validation failed".into() };
    assert_eq!(Error::from(api.clone()).to_string(), api.to_string());

    let core = ft_core::Error::InvalidKind("yoga".into());
    let expected = core.to_string();
    assert_eq!(Error::from(core).to_string(), expected);
}
