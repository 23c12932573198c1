//! RBT 内存存储实现

use crate::error::StorageError;
use crate::traits::RbtStore;
use domain::{ApsSettings, ManualBlockOutcome};
use std::collections::HashMap;
use std::sync::RwLock;

/// RBT 内存存储
///
/// token 按角色保存，读取时取角色最高者。
pub struct InMemoryRbtStore {
    flats: RwLock<HashMap<i64, ApsSettings>>,
    tokens: RwLock<HashMap<i64, Vec<(i32, String)>>>,
}

impl InMemoryRbtStore {
    pub fn new() -> Self {
        Self {
            flats: RwLock::new(HashMap::new()),
            tokens: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert_flat(&self, settings: ApsSettings) -> Result<(), StorageError> {
        let mut flats = self
            .flats
            .write()
            .map_err(|_| StorageError::new("rbt lock poisoned"))?;
        flats.insert(settings.house_flat_id, settings);
        Ok(())
    }

    pub fn insert_token(
        &self,
        house_flat_id: i64,
        role: i32,
        token: impl Into<String>,
    ) -> Result<(), StorageError> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| StorageError::new("rbt lock poisoned"))?;
        tokens
            .entry(house_flat_id)
            .or_default()
            .push((role, token.into()));
        Ok(())
    }
}

impl Default for InMemoryRbtStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RbtStore for InMemoryRbtStore {
    async fn find_auth_token(&self, house_flat_id: i64) -> Result<Option<String>, StorageError> {
        let tokens = self
            .tokens
            .read()
            .map_err(|_| StorageError::new("rbt lock poisoned"))?;
        Ok(tokens.get(&house_flat_id).and_then(|entries| {
            entries
                .iter()
                .filter(|(_, token)| !token.is_empty())
                .max_by_key(|(role, _)| *role)
                .map(|(_, token)| token.clone())
        }))
    }

    async fn find_aps_settings(
        &self,
        house_flat_id: i64,
    ) -> Result<Option<ApsSettings>, StorageError> {
        let flats = self
            .flats
            .read()
            .map_err(|_| StorageError::new("rbt lock poisoned"))?;
        Ok(flats.get(&house_flat_id).cloned())
    }

    async fn clear_manual_block(
        &self,
        house_flat_id: i64,
    ) -> Result<Option<ManualBlockOutcome>, StorageError> {
        let mut flats = self
            .flats
            .write()
            .map_err(|_| StorageError::new("rbt lock poisoned"))?;
        let Some(settings) = flats.get_mut(&house_flat_id) else {
            return Ok(None);
        };
        if !settings.manual_block.unwrap_or(false) {
            return Ok(Some(ManualBlockOutcome::AlreadyCleared));
        }
        settings.manual_block = Some(false);
        Ok(Some(ManualBlockOutcome::Cleared))
    }
}
