//! 追踪、请求 ID 生成与对账计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 对账指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub camera_runs: u64,
    pub tv_runs: u64,
    pub network_runs: u64,
    pub intercom_runs: u64,
    pub source_failures: u64,
    pub discrepancies_reported: u64,
    pub fix_attempts: u64,
    pub fix_failures: u64,
    pub passage_days_dropped: u64,
}

/// 对账指标（进程内，不持久化）。
pub struct TelemetryMetrics {
    camera_runs: AtomicU64,
    tv_runs: AtomicU64,
    network_runs: AtomicU64,
    intercom_runs: AtomicU64,
    source_failures: AtomicU64,
    discrepancies_reported: AtomicU64,
    fix_attempts: AtomicU64,
    fix_failures: AtomicU64,
    passage_days_dropped: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            camera_runs: AtomicU64::new(0),
            tv_runs: AtomicU64::new(0),
            network_runs: AtomicU64::new(0),
            intercom_runs: AtomicU64::new(0),
            source_failures: AtomicU64::new(0),
            discrepancies_reported: AtomicU64::new(0),
            fix_attempts: AtomicU64::new(0),
            fix_failures: AtomicU64::new(0),
            passage_days_dropped: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            camera_runs: self.camera_runs.load(Ordering::Relaxed),
            tv_runs: self.tv_runs.load(Ordering::Relaxed),
            network_runs: self.network_runs.load(Ordering::Relaxed),
            intercom_runs: self.intercom_runs.load(Ordering::Relaxed),
            source_failures: self.source_failures.load(Ordering::Relaxed),
            discrepancies_reported: self.discrepancies_reported.load(Ordering::Relaxed),
            fix_attempts: self.fix_attempts.load(Ordering::Relaxed),
            fix_failures: self.fix_failures.load(Ordering::Relaxed),
            passage_days_dropped: self.passage_days_dropped.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录摄像头对账次数。
pub fn record_camera_run() {
    metrics().camera_runs.fetch_add(1, Ordering::Relaxed);
}

/// 记录 TV 对账次数。
pub fn record_tv_run() {
    metrics().tv_runs.fetch_add(1, Ordering::Relaxed);
}

/// 记录网络会话对账次数。
pub fn record_network_run() {
    metrics().network_runs.fetch_add(1, Ordering::Relaxed);
}

/// 记录对讲对账次数。
pub fn record_intercom_run() {
    metrics().intercom_runs.fetch_add(1, Ordering::Relaxed);
}

/// 记录单个数据源拉取失败次数。
pub fn record_source_failure() {
    metrics().source_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录报告中的差异条目数。
pub fn record_discrepancies(count: u64) {
    if count == 0 {
        return;
    }
    metrics()
        .discrepancies_reported
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录运营商重同步尝试次数。
pub fn record_fix_attempt() {
    metrics().fix_attempts.fetch_add(1, Ordering::Relaxed);
}

/// 记录运营商重同步失败次数。
pub fn record_fix_failure() {
    metrics().fix_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录被丢弃的通行记录天数。
pub fn record_passage_day_dropped() {
    metrics()
        .passage_days_dropped
        .fetch_add(1, Ordering::Relaxed);
}
