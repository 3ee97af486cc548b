//! Sled-based World Store Implementation

use async_trait::async_trait;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{StoreError, WorldSnapshot, WorldStorePort};
use crate::domain::asset::AssetEntry;
use crate::domain::voice::{CharacterId, WorldId};

/// 存档记录 (bincode)
#[derive(Debug, Serialize, Deserialize)]
struct StoredWorld {
    theme: Option<String>,
    cast_map: BTreeMap<String, String>,
    locations: Vec<AssetEntry>,
    characters: Vec<AssetEntry>,
    saved_at: i64,
}

/// Sled 世界存档
pub struct SledWorldStore {
    db: Db,
}

impl SledWorldStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path.as_ref()).map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %path.as_ref().display(),
            worlds = db.scan_prefix("world:").count(),
            "SledWorldStore initialized"
        );

        Ok(Self { db })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn key(world_id: &WorldId) -> String {
        format!("world:{}", world_id.as_str())
    }
}

#[async_trait]
impl WorldStorePort for SledWorldStore {
    async fn save_world(&self, snapshot: &WorldSnapshot) -> Result<(), StoreError> {
        let stored = StoredWorld {
            theme: snapshot.theme.clone(),
            cast_map: snapshot
                .cast_map
                .iter()
                .map(|(character, identity)| (character.as_str().to_string(), identity.clone()))
                .collect(),
            locations: snapshot.locations.clone(),
            characters: snapshot.characters.clone(),
            saved_at: snapshot.saved_at.timestamp(),
        };

        let bytes = bincode::serialize(&stored)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        self.db
            .insert(Self::key(&snapshot.world_id), bytes)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            world_id = %snapshot.world_id,
            cast_size = stored.cast_map.len(),
            locations = stored.locations.len(),
            characters = stored.characters.len(),
            "World archived"
        );

        Ok(())
    }

    async fn load_world(&self, world_id: &WorldId) -> Result<Option<WorldSnapshot>, StoreError> {
        match self.db.get(Self::key(world_id)) {
            Ok(Some(bytes)) => {
                let stored: StoredWorld = bincode::deserialize(&bytes)
                    .map_err(|e| StoreError::SerializationError(e.to_string()))?;

                let mut cast_map = BTreeMap::new();
                for (key, identity) in stored.cast_map {
                    let character = CharacterId::new(key)
                        .map_err(|e| StoreError::SerializationError(e.to_string()))?;
                    cast_map.insert(character, identity);
                }

                let saved_at = DateTime::from_timestamp(stored.saved_at, 0).ok_or_else(|| {
                    StoreError::SerializationError("Timestamp out of range".to_string())
                })?;

                Ok(Some(WorldSnapshot {
                    world_id: world_id.clone(),
                    theme: stored.theme,
                    cast_map,
                    locations: stored.locations,
                    characters: stored.characters,
                    saved_at,
                }))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::DatabaseError(e.to_string())),
        }
    }

    async fn delete_world(&self, world_id: &WorldId) -> Result<(), StoreError> {
        self.db
            .remove(Self::key(world_id))
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    async fn list_worlds(&self) -> Result<Vec<WorldId>, StoreError> {
        let mut worlds = Vec::new();
        for item in self.db.scan_prefix("world:") {
            let (key, _) = item.map_err(|e| StoreError::DatabaseError(e.to_string()))?;
            let key = String::from_utf8(key.to_vec())
                .map_err(|e| StoreError::SerializationError(e.to_string()))?;
            if let Some(id) = key.strip_prefix("world:") {
                if let Ok(world_id) = WorldId::new(id) {
                    worlds.push(world_id);
                }
            }
        }
        Ok(worlds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    use crate::domain::asset::{AssetKind, StateKey};

    fn sample_snapshot(world_id: &str) -> WorldSnapshot {
        let mut cast_map = BTreeMap::new();
        cast_map.insert(
            CharacterId::new("char_detective").unwrap(),
            "가레스".to_string(),
        );
        cast_map.insert(
            CharacterId::new("char_informant").unwrap(),
            "리나".to_string(),
        );

        let mut variations = BTreeMap::new();
        variations.insert(
            StateKey::raw("day_clear_peaceful".to_string()),
            "https://img.example/alley.png".to_string(),
        );
        variations.insert(
            StateKey::raw("night_rain_tense".to_string()),
            "https://img.example/alley_night.png".to_string(),
        );
        let location = AssetEntry::restore(
            "loc_뒷골목_a1b2c3".to_string(),
            AssetKind::Location,
            "뒷골목".to_string(),
            "https://img.example/alley.png".to_string(),
            variations,
            Utc::now(),
        );

        WorldSnapshot {
            world_id: WorldId::new(world_id).unwrap(),
            theme: Some("느와르".to_string()),
            cast_map,
            locations: vec![location],
            characters: Vec::new(),
            saved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SledWorldStore::open(dir.path().join("worlds.sled")).unwrap();

        let snapshot = sample_snapshot("dim_noir_01");
        store.save_world(&snapshot).await.unwrap();

        let loaded = store.load_world(&snapshot.world_id).await.unwrap().unwrap();
        assert_eq!(loaded.theme.as_deref(), Some("느와르"));
        assert_eq!(loaded.cast_map.len(), 2);
        assert_eq!(
            loaded
                .cast_map
                .get(&CharacterId::new("char_detective").unwrap())
                .map(String::as_str),
            Some("가레스")
        );

        assert_eq!(loaded.locations.len(), 1);
        let location = &loaded.locations[0];
        assert_eq!(location.display_name(), "뒷골목");
        assert_eq!(
            location.variation(&StateKey::raw("night_rain_tense".to_string())),
            Some("https://img.example/alley_night.png")
        );
    }

    #[tokio::test]
    async fn test_load_missing_world() {
        let dir = tempdir().unwrap();
        let store = SledWorldStore::open(dir.path().join("worlds.sled")).unwrap();

        let loaded = store
            .load_world(&WorldId::new("dim_ghost").unwrap())
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_overwrite_delete_list() {
        let dir = tempdir().unwrap();
        let store = SledWorldStore::open(dir.path().join("worlds.sled")).unwrap();

        store.save_world(&sample_snapshot("dim_a")).await.unwrap();
        store.save_world(&sample_snapshot("dim_b")).await.unwrap();

        // 同一世界覆盖, 不产生第二条
        let mut updated = sample_snapshot("dim_a");
        updated.theme = Some("좀비".to_string());
        store.save_world(&updated).await.unwrap();

        let mut listed = store.list_worlds().await.unwrap();
        listed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].as_str(), "dim_a");

        let reloaded = store.load_world(&updated.world_id).await.unwrap().unwrap();
        assert_eq!(reloaded.theme.as_deref(), Some("좀비"));

        store.delete_world(&updated.world_id).await.unwrap();
        assert!(store.load_world(&updated.world_id).await.unwrap().is_none());
        assert_eq!(store.list_worlds().await.unwrap().len(), 1);
    }
}
