//! 缓存文档内存存储实现

use crate::error::StorageError;
use crate::models::{CameraScope, in_scope};
use crate::traits::CacheStore;
use crate::validation::login_key;
use domain::{CameraRecord, LoginDocument};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

struct StoredCamera {
    camera: CameraRecord,
    flat_ids: Vec<i64>,
}

/// 缓存文档内存存储
///
/// 登录文档以原始 JSON 保存，读取时与 Redis 实现走同一解析路径。
pub struct InMemoryCacheStore {
    logins: RwLock<HashMap<String, Value>>,
    cameras: RwLock<Vec<StoredCamera>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self {
            logins: RwLock::new(HashMap::new()),
            cameras: RwLock::new(Vec::new()),
        }
    }

    /// 写入登录文档。
    pub fn insert_login(&self, login: &str, document: Value) -> Result<(), StorageError> {
        let key = login_key(login)?;
        let mut logins = self
            .logins
            .write()
            .map_err(|_| StorageError::new("cache lock poisoned"))?;
        logins.insert(key, document);
        Ok(())
    }

    /// 写入个人摄像头及其 flatIds。
    pub fn insert_camera(&self, camera: CameraRecord, flat_ids: Vec<i64>) -> Result<(), StorageError> {
        let mut cameras = self
            .cameras
            .write()
            .map_err(|_| StorageError::new("cache lock poisoned"))?;
        cameras.retain(|stored| stored.camera.id != camera.id);
        cameras.push(StoredCamera { camera, flat_ids });
        Ok(())
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn login_document(&self, login: &str) -> Result<Option<LoginDocument>, StorageError> {
        let key = login_key(login)?;
        let logins = self
            .logins
            .read()
            .map_err(|_| StorageError::new("cache lock poisoned"))?;
        Ok(logins
            .get(&key)
            .cloned()
            .map(|value| LoginDocument::from_value(login.trim(), value)))
    }

    async fn personal_cameras(
        &self,
        scope: CameraScope,
    ) -> Result<Vec<CameraRecord>, StorageError> {
        let cameras = self
            .cameras
            .read()
            .map_err(|_| StorageError::new("cache lock poisoned"))?;
        Ok(cameras
            .iter()
            .filter(|stored| in_scope(stored.camera.house_ids.as_deref(), &stored.flat_ids, scope))
            .map(|stored| stored.camera.clone())
            .collect())
    }
}
