//! Sled-based Cue Store Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{CueClip, CueStoreError, CueStorePort, CueStoreStats};
use crate::domain::audio::CueKind;

/// Sled 提示缓存配置
#[derive(Debug, Clone)]
pub struct SledCueStoreConfig {
    /// 数据库路径
    pub db_path: String,
    /// 最大条目数
    pub max_entries: usize,
}

impl Default for SledCueStoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/cues.sled".to_string(),
            max_entries: 64,
        }
    }
}

/// 内部缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCueClip {
    kind: CueKind,
    url: String,
    created_at: i64,
    last_used_at: i64,
    use_count: u64,
}

impl StoredCueClip {
    fn to_clip(&self, category_id: &str) -> Result<CueClip, CueStoreError> {
        let created_at = DateTime::from_timestamp(self.created_at, 0).ok_or_else(|| {
            CueStoreError::SerializationError("Timestamp out of range".to_string())
        })?;
        let last_used_at = DateTime::from_timestamp(self.last_used_at, 0).ok_or_else(|| {
            CueStoreError::SerializationError("Timestamp out of range".to_string())
        })?;

        Ok(CueClip {
            category_id: category_id.to_string(),
            kind: self.kind,
            url: self.url.clone(),
            created_at,
            last_used_at,
            use_count: self.use_count,
        })
    }
}

/// Sled 音频提示缓存
pub struct SledCueStore {
    db: Db,
    max_entries: usize,
}

impl SledCueStore {
    pub fn new(config: &SledCueStoreConfig) -> Result<Self, CueStoreError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| CueStoreError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            max_entries = config.max_entries,
            entries = db.scan_prefix("cue:").count(),
            "SledCueStore initialized"
        );

        Ok(Self {
            db,
            max_entries: config.max_entries,
        })
    }

    pub fn open<P: AsRef<Path>>(path: P, max_entries: usize) -> Result<Self, CueStoreError> {
        let config = SledCueStoreConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
            max_entries,
        };
        Self::new(&config)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), CueStoreError> {
        self.db
            .flush()
            .map_err(|e| CueStoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn key(category_id: &str) -> String {
        format!("cue:{}", category_id)
    }

    fn entry_count(&self) -> usize {
        self.db.scan_prefix("cue:").count()
    }

    /// 按 created_at 淘汰最旧条目
    fn evict_oldest(&self) -> Result<bool, CueStoreError> {
        let mut oldest: Option<(String, StoredCueClip)> = None;

        for item in self.db.scan_prefix("cue:") {
            let (key, value) = item.map_err(|e| CueStoreError::DatabaseError(e.to_string()))?;
            if let Ok(clip) = bincode::deserialize::<StoredCueClip>(&value) {
                let is_older = oldest
                    .as_ref()
                    .map(|(_, c)| clip.created_at < c.created_at)
                    .unwrap_or(true);

                if is_older {
                    let key_str = String::from_utf8(key.to_vec())
                        .map_err(|e| CueStoreError::SerializationError(e.to_string()))?;
                    oldest = Some((key_str, clip));
                }
            }
        }

        match oldest {
            Some((key, clip)) => {
                self.db
                    .remove(&key)
                    .map_err(|e| CueStoreError::DatabaseError(e.to_string()))?;
                tracing::debug!(
                    key = %key,
                    created_at = clip.created_at,
                    "Evicted oldest cue clip"
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CueStorePort for SledCueStore {
    async fn get(&self, category_id: &str) -> Result<Option<CueClip>, CueStoreError> {
        match self.db.get(Self::key(category_id)) {
            Ok(Some(bytes)) => {
                let stored: StoredCueClip = bincode::deserialize(&bytes)
                    .map_err(|e| CueStoreError::SerializationError(e.to_string()))?;
                Ok(Some(stored.to_clip(category_id)?))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(CueStoreError::DatabaseError(e.to_string())),
        }
    }

    async fn put(&self, clip: CueClip) -> Result<(), CueStoreError> {
        let key = Self::key(&clip.category_id);
        let replacing = self
            .db
            .contains_key(&key)
            .map_err(|e| CueStoreError::DatabaseError(e.to_string()))?;

        // 腾出空间, 同类别覆盖不占新位
        if !replacing {
            while self.entry_count() >= self.max_entries {
                if !self.evict_oldest()? {
                    break;
                }
            }
        }

        let stored = StoredCueClip {
            kind: clip.kind,
            url: clip.url,
            created_at: clip.created_at.timestamp(),
            last_used_at: clip.last_used_at.timestamp(),
            use_count: clip.use_count,
        };
        let bytes = bincode::serialize(&stored)
            .map_err(|e| CueStoreError::SerializationError(e.to_string()))?;
        self.db
            .insert(key, bytes)
            .map_err(|e| CueStoreError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            category_id = %clip.category_id,
            kind = clip.kind.label(),
            "Cue clip cached"
        );

        Ok(())
    }

    async fn touch(&self, category_id: &str) -> Result<(), CueStoreError> {
        let key = Self::key(category_id);

        match self.db.get(&key) {
            Ok(Some(bytes)) => {
                let mut stored: StoredCueClip = bincode::deserialize(&bytes)
                    .map_err(|e| CueStoreError::SerializationError(e.to_string()))?;
                stored.use_count += 1;
                stored.last_used_at = Utc::now().timestamp();

                let bytes = bincode::serialize(&stored)
                    .map_err(|e| CueStoreError::SerializationError(e.to_string()))?;
                self.db
                    .insert(&key, bytes)
                    .map_err(|e| CueStoreError::DatabaseError(e.to_string()))?;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => Err(CueStoreError::DatabaseError(e.to_string())),
        }
    }

    async fn stats(&self) -> CueStoreStats {
        CueStoreStats {
            total_entries: self.entry_count(),
            max_entries: self.max_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn clip_at(category_id: &str, hours_ago: i64) -> CueClip {
        let at = Utc::now() - chrono::Duration::hours(hours_ago);
        CueClip {
            category_id: category_id.to_string(),
            kind: CueKind::Sfx,
            url: format!("https://audio.example/{}.mp3", category_id),
            created_at: at,
            last_used_at: at,
            use_count: 1,
        }
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SledCueStore::open(dir.path().join("cues.sled"), 16).unwrap();

        let clip = CueClip::new(
            "weather_rain".to_string(),
            CueKind::Sfx,
            "https://audio.example/rain.mp3".to_string(),
        );
        store.put(clip).await.unwrap();

        let loaded = store.get("weather_rain").await.unwrap().unwrap();
        assert_eq!(loaded.url, "https://audio.example/rain.mp3");
        assert_eq!(loaded.kind, CueKind::Sfx);
        assert_eq!(loaded.use_count, 1);

        assert!(store.get("bgm_tension").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_touch_increments_use_count() {
        let dir = tempdir().unwrap();
        let store = SledCueStore::open(dir.path().join("cues.sled"), 16).unwrap();

        store.put(clip_at("combat_sword", 1)).await.unwrap();
        store.touch("combat_sword").await.unwrap();
        store.touch("combat_sword").await.unwrap();

        let loaded = store.get("combat_sword").await.unwrap().unwrap();
        assert_eq!(loaded.use_count, 3);
        assert!(loaded.last_used_at >= loaded.created_at);

        // 未命中条目不报错
        assert!(store.touch("bgm_ghost").await.is_ok());
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let dir = tempdir().unwrap();
        let store = SledCueStore::open(dir.path().join("cues.sled"), 2).unwrap();

        store.put(clip_at("weather_rain", 3)).await.unwrap();
        store.put(clip_at("weather_thunder", 2)).await.unwrap();
        store.put(clip_at("bgm_tension", 1)).await.unwrap();

        assert!(store.get("weather_rain").await.unwrap().is_none());
        assert!(store.get("weather_thunder").await.unwrap().is_some());
        assert!(store.get("bgm_tension").await.unwrap().is_some());

        let stats = store.stats().await;
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.max_entries, 2);
    }

    #[tokio::test]
    async fn test_same_category_replaces_without_eviction() {
        let dir = tempdir().unwrap();
        let store = SledCueStore::open(dir.path().join("cues.sled"), 2).unwrap();

        store.put(clip_at("weather_rain", 2)).await.unwrap();
        store.put(clip_at("bgm_peaceful", 1)).await.unwrap();

        let mut updated = clip_at("weather_rain", 0);
        updated.url = "https://audio.example/rain_v2.mp3".to_string();
        store.put(updated).await.unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.total_entries, 2);

        let loaded = store.get("weather_rain").await.unwrap().unwrap();
        assert_eq!(loaded.url, "https://audio.example/rain_v2.mp3");
        assert!(store.get("bgm_peaceful").await.unwrap().is_some());
    }
}
