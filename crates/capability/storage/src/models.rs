//! 数据模型
//!
//! 存储层自有的查询模型；记录类型复用 `domain`：
//! - 缓存：LoginDocument、CameraRecord
//! - RADIUS：RadiusSession
//! - RBT：ApsSettings、ManualBlockOutcome

/// 个人摄像头的检索范围。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraScope {
    /// 绑定到指定 flatId 的摄像头。
    Flat(i64),
    /// `houseIds` 包含该数字登录名的摄像头。
    House(i64),
}

/// RADIUS 字符串列中表示“空”的取值。
pub const NULL_SENTINELS: [&str; 3] = ["", "null", "None"];

/// 去除空值哨兵。
pub fn strip_sentinel(value: Option<String>) -> Option<String> {
    value.filter(|text| !NULL_SENTINELS.contains(&text.trim()))
}

/// 摄像头是否落在检索范围内。
pub fn in_scope(house_ids: Option<&[i64]>, flat_ids: &[i64], scope: CameraScope) -> bool {
    match scope {
        CameraScope::Flat(flat_id) => flat_ids.contains(&flat_id),
        CameraScope::House(login) => house_ids.is_some_and(|ids| ids.contains(&login)),
    }
}
