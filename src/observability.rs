//! Observability features: packet-transfer metrics.
//!
//! Crossbar exposes the following metrics via `metrics-rs`:
//!
//! | Metric | Type | Description |
//! |--------|------|-------------|
//! | `crossbar_packets_pushed` | Counter | Packets transferred over push connections |
//! | `crossbar_packets_pulled` | Counter | Packets transferred over pull connections |
//! | `crossbar_packets_dropped` | Counter | Packets dropped on unconnected outputs |
//!
//! Use a metrics exporter (prometheus, statsd, etc.) to collect them.

use metrics::{counter, Unit};
use std::sync::atomic::{AtomicBool, Ordering};

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

const PACKETS_PUSHED: &str = "crossbar_packets_pushed";
const PACKETS_PULLED: &str = "crossbar_packets_pulled";
const PACKETS_DROPPED: &str = "crossbar_packets_dropped";

/// Initialize metric descriptions.
///
/// Call this once at application startup. Safe to call multiple times
/// (subsequent calls are no-ops).
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    metrics::describe_counter!(
        PACKETS_PUSHED,
        Unit::Count,
        "Packets transferred over push connections"
    );
    metrics::describe_counter!(
        PACKETS_PULLED,
        Unit::Count,
        "Packets transferred over pull connections"
    );
    metrics::describe_counter!(
        PACKETS_DROPPED,
        Unit::Count,
        "Packets dropped on unconnected outputs"
    );
}

/// Record a packet pushed downstream.
#[inline]
pub fn record_push() {
    counter!(PACKETS_PUSHED).increment(1);
}

/// Record a packet pulled from upstream.
#[inline]
pub fn record_pull() {
    counter!(PACKETS_PULLED).increment(1);
}

/// Record a packet dropped on an unconnected output.
#[inline]
pub fn record_drop() {
    counter!(PACKETS_DROPPED).increment(1);
}
