//! reqwest 客户端构造与响应解析。

use crate::error::SourceError;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// 构造带整体超时的客户端。
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .connect_timeout(timeout.min(Duration::from_secs(5)))
        .timeout(timeout)
        .build()
        .map_err(|err| SourceError::Unavailable {
            source_name: "http client",
            message: err.to_string(),
        })
}

/// 发送请求，非 2xx 视为拒绝，成功时解析 JSON。
pub async fn read_json<T: DeserializeOwned>(
    source_name: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, SourceError> {
    let response = request
        .send()
        .await
        .map_err(|err| classify(source_name, err))?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Rejected {
            source_name,
            status: status.as_u16(),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|err| SourceError::decode(source_name, err.to_string()))
}

/// 发送请求，仅检查状态码。
pub async fn expect_success(
    source_name: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<(), SourceError> {
    let response = request
        .send()
        .await
        .map_err(|err| classify(source_name, err))?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(SourceError::Rejected {
            source_name,
            status: status.as_u16(),
        });
    }
    Ok(())
}

pub fn classify(source_name: &'static str, err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout { source_name }
    } else if err.is_decode() {
        SourceError::decode(source_name, err.to_string())
    } else {
        SourceError::Unavailable {
            source_name,
            message: err.to_string(),
        }
    }
}

/// 仅对超时/连接错误重试，共尝试 `attempts` 次。
pub async fn with_retry<T, F, Fut>(
    source_name: &'static str,
    attempts: u64,
    mut call: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 0u64;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if !err.is_transient() || attempt >= attempts {
                    return Err(err);
                }
                warn!(target: "diag.sources", source_name, attempt, error = %err, "retrying");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[tokio::test]
    async fn retry_stops_after_attempts() {
        let calls = AtomicU64::new(0);
        let result: Result<(), SourceError> = with_retry("erp", 2, || {
            calls.fetch_add(1, Ordering::Relaxed);
            async { Err(SourceError::Timeout { source_name: "erp" }) }
        })
        .await;
        assert!(matches!(result, Err(SourceError::Timeout { .. })));
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn retry_skips_permanent_errors() {
        let calls = AtomicU64::new(0);
        let result: Result<(), SourceError> = with_retry("erp", 3, || {
            calls.fetch_add(1, Ordering::Relaxed);
            async {
                Err(SourceError::Rejected {
                    source_name: "erp",
                    status: 500,
                })
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }
}
