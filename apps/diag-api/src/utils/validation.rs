//! 输入验证辅助函数
//!
//! - normalize_required：去除首尾空格并检查非空
//! - require_login：读取查询参数中的登录名
//! - require_positive：标识必须为正数

use crate::utils::response::bad_request_error;
use axum::response::Response;

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: String, field: &str) -> Result<String, Response> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

/// 查询参数 `login` 缺失与空串同样处理
pub fn require_login(value: Option<String>) -> Result<String, Response> {
    normalize_required(value.unwrap_or_default(), "login")
}

pub fn require_positive(value: i64, field: &str) -> Result<i64, Response> {
    if value <= 0 {
        return Err(bad_request_error(format!("{field} must be positive")));
    }
    Ok(value)
}
