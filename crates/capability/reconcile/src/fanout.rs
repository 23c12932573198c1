//! 并发拉取与失败收敛。
//!
//! 所有任务都运行到结束（不因单个失败取消其他任务），每个任务的结果独立保留。

use diag_telemetry::record_source_failure;
use futures::future::join_all;
use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// 等待全部任务结束，按输入顺序返回各自结果。
pub async fn settle_all<I, F, T, E>(tasks: I) -> Vec<Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(tasks).await
}

/// 把失败记为警告日志并计数，返回 None。
pub fn settled<T, E: Display>(
    source_name: &'static str,
    login: &str,
    result: Result<T, E>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            record_source_failure();
            warn!(target: "diag.reconcile", source_name, login, error = %err, "source_failed");
            None
        }
    }
}
