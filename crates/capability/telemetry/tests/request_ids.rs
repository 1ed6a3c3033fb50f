use avconf_telemetry::{TelemetryMetrics, new_request_ids};

#[test]
fn request_ids_non_empty() {
    let ids = new_request_ids();
    assert!(!ids.request_id.is_empty());
    assert!(!ids.trace_id.is_empty());
    assert_ne!(ids.request_id, ids.trace_id);
}

#[test]
fn metrics_split_by_status_class() {
    let metrics = TelemetryMetrics::new();
    metrics.record(200);
    metrics.record(404);
    metrics.record(400);
    metrics.record(500);
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.requests, 4);
    assert_eq!(snapshot.client_errors, 2);
    assert_eq!(snapshot.server_errors, 1);
}
