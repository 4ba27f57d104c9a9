//! Metrics collection.
//!
//! # Metrics
//! - `router_navigations_total` (counter): completed navigations by outcome
//!   (`resolved`, `not_found`, `discarded`)
//! - `router_table_builds_total` (counter): table builds by result (`ok`, `error`)
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; installing an exporter is up to
//!   the host application
//! - Labels are static strings only

/// Record a completed navigation.
pub fn record_navigation(outcome: &'static str) {
    ::metrics::counter!("router_navigations_total", "outcome" => outcome).increment(1);
}

/// Record a route table build attempt.
pub fn record_table_build(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    ::metrics::counter!("router_table_builds_total", "result" => result).increment(1);
}
