//! 对账计数快照
//!
//! - GET /metrics

use crate::utils::ok;
use api_contract::MetricsSnapshotDto;
use axum::response::Response;
use diag_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    ok(MetricsSnapshotDto {
        camera_runs: snapshot.camera_runs,
        tv_runs: snapshot.tv_runs,
        network_runs: snapshot.network_runs,
        intercom_runs: snapshot.intercom_runs,
        source_failures: snapshot.source_failures,
        discrepancies_reported: snapshot.discrepancies_reported,
        fix_attempts: snapshot.fix_attempts,
        fix_failures: snapshot.fix_failures,
        passage_days_dropped: snapshot.passage_days_dropped,
    })
}
