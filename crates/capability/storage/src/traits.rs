//! 存储接口 Trait 定义
//!
//! - CacheStore：Redis 缓存文档（login:*、摄像头索引）
//! - RadiusStore：RADIUS 会话库
//! - RbtStore：RBT 对讲/门禁库
//!
//! 所有接口返回 StorageError，使用 async_trait 支持动态分发。

use crate::error::StorageError;
use crate::models::CameraScope;
use async_trait::async_trait;
use domain::{ApsSettings, CameraRecord, LoginDocument, ManualBlockOutcome, RadiusSession};

/// 缓存文档存储接口
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 读取 `login:{login}` 文档；不存在返回 None。
    async fn login_document(&self, login: &str) -> Result<Option<LoginDocument>, StorageError>;

    /// 检索个人摄像头。
    async fn personal_cameras(&self, scope: CameraScope)
    -> Result<Vec<CameraRecord>, StorageError>;
}

/// RADIUS 会话存储接口
#[async_trait]
pub trait RadiusStore: Send + Sync {
    /// 按登录名查找 1C 计费的会话行。
    async fn find_session(&self, login: &str) -> Result<Option<RadiusSession>, StorageError>;
}

/// RBT 存储接口
#[async_trait]
pub trait RbtStore: Send + Sync {
    /// 该套房角色最高的移动端 token。
    async fn find_auth_token(&self, house_flat_id: i64) -> Result<Option<String>, StorageError>;

    /// 套房的门禁设置。
    async fn find_aps_settings(
        &self,
        house_flat_id: i64,
    ) -> Result<Option<ApsSettings>, StorageError>;

    /// 在单个事务内解除手动封锁；套房不存在返回 None。
    async fn clear_manual_block(
        &self,
        house_flat_id: i64,
    ) -> Result<Option<ManualBlockOutcome>, StorageError>;
}
