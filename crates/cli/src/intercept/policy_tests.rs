// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[parameterized(
    api_list = { "http://app.test/api/v1/workouts", Strategy::NetworkFirstApi },
    api_stats = { "http://app.test/api/v1/stats?range=7d", Strategy::NetworkFirstApi },
    bundle = { "http://app.test/static/js/bundle.js", Strategy::CacheFirst },
    icon = { "http://app.test/icons/icon-192x192.png", Strategy::CacheFirst },
    font_css = { "https://fonts.googleapis.com/css2?family=Inter", Strategy::CacheFirst },
    woff = { "http://app.test/fonts/inter.woff2", Strategy::CacheFirst },
    manifest = { "http://app.test/manifest.json", Strategy::Passthrough },
    page = { "http://app.test/dashboard", Strategy::Passthrough },
)]
fn get_requests_are_classified(target: &str, expected: Strategy) {
    assert_eq!(classify(&Request::get(url(target)), "/api/"), expected);
}

#[parameterized(
    post = { Method::POST },
    put = { Method::PUT },
    delete = { Method::DELETE },
)]
fn mutations_bypass_even_on_api_paths(method: Method) {
    let request = Request::new(method, url("http://app.test/api/v1/workouts"));
    assert_eq!(classify(&request, "/api/"), Strategy::Bypass);
}

#[test]
fn navigation_is_network_first() {
    let request = Request::navigate(url("http://app.test/workouts/42"));
    assert_eq!(classify(&request, "/api/"), Strategy::NetworkFirstNavigation);
}

#[test]
fn api_prefix_wins_over_static_extension() {
    let request = Request::get(url("http://app.test/api/v1/export.js"));
    assert_eq!(classify(&request, "/api/"), Strategy::NetworkFirstApi);
}

#[test]
fn static_asset_wins_over_navigation() {
    let request = Request::navigate(url("http://app.test/static/report.svg"));
    assert_eq!(classify(&request, "/api/"), Strategy::CacheFirst);
}
