//! 验证辅助函数
//!
//! - login_key：校验登录名并构造缓存键
//! - escape_tag：RediSearch TAG 值转义
//! - camera_query：构造摄像头索引查询

use crate::error::StorageError;
use crate::models::CameraScope;
use domain::camera::PERSONAL_CAMERA_TYPE;

/// 校验登录名并返回 `login:{login}` 键。
pub fn login_key(login: &str) -> Result<String, StorageError> {
    let login = login.trim();
    if login.is_empty() {
        return Err(StorageError::new("login required"));
    }
    if login.chars().any(|ch| ch.is_whitespace() || matches!(ch, '*' | '?' | '[' | ']')) {
        return Err(StorageError::new("login contains invalid characters"));
    }
    Ok(format!("login:{login}"))
}

/// 转义 TAG 查询中的标点与空白。
pub fn escape_tag(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii_punctuation() || ch.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// 摄像头索引查询语句。
///
/// `House` 范围返回全部个人摄像头，按 houseIds 过滤在调用方完成。
pub fn camera_query(scope: CameraScope) -> String {
    let personal = format!("@CamType:{{{}}}", escape_tag(PERSONAL_CAMERA_TYPE));
    match scope {
        CameraScope::Flat(flat_id) => format!("{personal} @flatIds:[{flat_id} {flat_id}]"),
        CameraScope::House(_) => personal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_key_trims_and_prefixes() {
        assert_eq!(login_key(" 100200 ").expect("key"), "login:100200");
        assert!(login_key("  ").is_err());
        assert!(login_key("a*").is_err());
    }

    #[test]
    fn escape_tag_escapes_punctuation() {
        assert_eq!(escape_tag("a-b c"), "a\\-b\\ c");
        assert_eq!(escape_tag("Личная"), "Личная");
    }

    #[test]
    fn flat_query_uses_numeric_range() {
        assert_eq!(
            camera_query(CameraScope::Flat(42)),
            "@CamType:{Личная} @flatIds:[42 42]"
        );
        assert_eq!(camera_query(CameraScope::House(7)), "@CamType:{Личная}");
    }
}
