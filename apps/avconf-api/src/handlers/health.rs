//! 健康检查与请求计数
//!
//! - GET /health
//! - GET /metrics

use crate::utils::response::json_ok;
use api_contract::{HealthDto, MetricsSnapshotDto};
use avconf_telemetry::metrics;
use axum::response::Response;

pub async fn health() -> Response {
    json_ok(HealthDto { ok: true })
}

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    json_ok(MetricsSnapshotDto {
        requests: snapshot.requests,
        client_errors: snapshot.client_errors,
        server_errors: snapshot.server_errors,
    })
}
