//! 外部数据源错误类型。

/// 外部数据源错误。
///
/// 对账引擎把每个拉取任务的结果都当作 `Result<T, SourceError>` 处理，
/// 单个来源失败只影响该来源。
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{source_name} unavailable: {message}")]
    Unavailable {
        source_name: &'static str,
        message: String,
    },
    #[error("{source_name} timed out")]
    Timeout { source_name: &'static str },
    #[error("{source_name} rejected request with status {status}")]
    Rejected {
        source_name: &'static str,
        status: u16,
    },
    #[error("{source_name} returned malformed data: {message}")]
    Decode {
        source_name: &'static str,
        message: String,
    },
    #[error("token not found for {0}")]
    TokenNotFound(String),
}

impl SourceError {
    /// 超时或连接失败，可重试。
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SourceError::Timeout { .. } | SourceError::Unavailable { .. }
        )
    }

    pub fn decode(source_name: &'static str, message: impl Into<String>) -> Self {
        SourceError::Decode {
            source_name,
            message: message.into(),
        }
    }
}
