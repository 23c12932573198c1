use diag_sources::SourceError;
use diag_storage::StorageError;

/// 对账错误。
///
/// 只有 `NotFound` 表示“没有任何可对账的数据”；其余来源失败都降级为报告中的警告。
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("source error: {0}")]
    Source(String),
}

impl From<StorageError> for ReconcileError {
    fn from(err: StorageError) -> Self {
        ReconcileError::Storage(err.to_string())
    }
}

impl From<SourceError> for ReconcileError {
    fn from(err: SourceError) -> Self {
        ReconcileError::Source(err.to_string())
    }
}
