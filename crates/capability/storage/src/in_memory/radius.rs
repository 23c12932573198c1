//! RADIUS 会话内存存储实现

use crate::error::StorageError;
use crate::traits::RadiusStore;
use domain::RadiusSession;
use std::collections::HashMap;
use std::sync::RwLock;

pub struct InMemoryRadiusStore {
    sessions: RwLock<HashMap<String, RadiusSession>>,
}

impl InMemoryRadiusStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, login: &str, session: RadiusSession) -> Result<(), StorageError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| StorageError::new("radius lock poisoned"))?;
        sessions.insert(login.to_string(), session);
        Ok(())
    }
}

impl Default for InMemoryRadiusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RadiusStore for InMemoryRadiusStore {
    async fn find_session(&self, login: &str) -> Result<Option<RadiusSession>, StorageError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| StorageError::new("radius lock poisoned"))?;
        Ok(sessions.get(login).cloned())
    }
}
