// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn names_carry_prefix_and_generation() {
    let names = CacheNames::new("fittrack", "v1.0.0");
    assert_eq!(names.static_cache, "fittrack-pro-v1.0.0");
    assert_eq!(names.api_cache, "fittrack-api-v1.0.0");
    assert_eq!(names.version(), "fittrack-pro-v1.0.0");
}

#[test]
fn only_current_generation_is_current() {
    let names = CacheNames::new("fittrack", "v2");
    assert!(names.is_current("fittrack-api-v2"));
    assert!(!names.is_current("fittrack-api-v1"));
    assert!(!names.is_current("other-pro-v2"));
}
