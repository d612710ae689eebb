//! Prometheus metrics recording.

use metrics::{counter, histogram};
use std::time::Duration;

/// Records HTTP request metrics.
///
/// `route` is the matched route template, not the raw path, so ids don't
/// explode label cardinality.
pub fn record_request(method: &str, route: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records a successful create of `entity` ("question" or "answer").
pub fn record_write(entity: &'static str) {
    counter!("responder_writes_total", "entity" => entity).increment(1);
}
