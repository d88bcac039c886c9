//! Dispatch metrics.
//!
//! # Metrics
//! - `router_handlers_invoked_total` (counter): handler calls by kind (sync, async)
//! - `router_handlers_gated_total` (counter): handlers skipped because their prefix was unchanged
//! - `router_rejections_total` (counter): navigations rejected by a handler
//! - `router_redirects_total` (counter): navigations redirected by a handler
//! - `router_navigations_total` (counter): committed navigations by mode

use crate::config::schema::Mode;

pub fn record_invocation(kind: &'static str) {
    ::metrics::counter!("router_handlers_invoked_total", "kind" => kind).increment(1);
}

pub fn record_gated() {
    ::metrics::counter!("router_handlers_gated_total").increment(1);
}

pub fn record_rejection() {
    ::metrics::counter!("router_rejections_total").increment(1);
}

pub fn record_redirect() {
    ::metrics::counter!("router_redirects_total").increment(1);
}

pub fn record_navigation(mode: Mode) {
    ::metrics::counter!("router_navigations_total", "mode" => mode.to_string()).increment(1);
}
