//! In-Memory World Manager Implementation

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{WorldError, WorldManagerPort, WorldSession};
use crate::domain::asset::AssetLibrary;
use crate::domain::voice::{CastingSession, WorldId};

/// 内存世界管理器
pub struct InMemoryWorldManager {
    worlds: DashMap<String, WorldSession>,
}

impl InMemoryWorldManager {
    pub fn new() -> Self {
        Self {
            worlds: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryWorldManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldManagerPort for InMemoryWorldManager {
    fn open(&self, session: WorldSession) -> Option<WorldSession> {
        let world_id = session.world_id.as_str().to_string();
        let replaced = self.worlds.insert(world_id.clone(), session);
        tracing::info!(
            world_id = %world_id,
            replaced = replaced.is_some(),
            "World session opened"
        );
        replaced
    }

    fn get(&self, world_id: &WorldId) -> Result<WorldSession, WorldError> {
        self.worlds
            .get(world_id.as_str())
            .map(|w| w.clone())
            .ok_or_else(|| WorldError::NotOpen(world_id.as_str().to_string()))
    }

    fn put_casting(&self, world_id: &WorldId, casting: CastingSession) -> Result<(), WorldError> {
        let mut session = self
            .worlds
            .get_mut(world_id.as_str())
            .ok_or_else(|| WorldError::NotOpen(world_id.as_str().to_string()))?;
        session.casting = casting;
        session.last_activity = Utc::now();
        tracing::debug!(world_id = %world_id, "World casting updated");
        Ok(())
    }

    fn put_assets(&self, world_id: &WorldId, assets: AssetLibrary) -> Result<(), WorldError> {
        let mut session = self
            .worlds
            .get_mut(world_id.as_str())
            .ok_or_else(|| WorldError::NotOpen(world_id.as_str().to_string()))?;
        session.assets = assets;
        session.last_activity = Utc::now();
        tracing::debug!(world_id = %world_id, "World assets updated");
        Ok(())
    }

    fn contains(&self, world_id: &WorldId) -> bool {
        self.worlds.contains_key(world_id.as_str())
    }

    fn touch(&self, world_id: &WorldId) {
        if let Some(mut session) = self.worlds.get_mut(world_id.as_str()) {
            session.last_activity = Utc::now();
        }
    }

    fn close(&self, world_id: &WorldId) -> Result<WorldSession, WorldError> {
        self.worlds
            .remove(world_id.as_str())
            .map(|(_, session)| {
                tracing::info!(world_id = %world_id, "World session closed");
                session
            })
            .ok_or_else(|| WorldError::NotOpen(world_id.as_str().to_string()))
    }

    fn expired_worlds(&self, idle_timeout_secs: u64) -> Vec<WorldId> {
        let now = Utc::now();
        let timeout = chrono::Duration::seconds(idle_timeout_secs as i64);

        self.worlds
            .iter()
            .filter_map(|entry| {
                let elapsed = now - entry.last_activity;
                if elapsed > timeout {
                    Some(entry.world_id.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    fn list_all(&self) -> Vec<WorldId> {
        self.worlds.iter().map(|e| e.world_id.clone()).collect()
    }
}
