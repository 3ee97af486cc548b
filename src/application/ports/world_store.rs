//! World Store Port - 世界存档
//!
//! 定义世界状态持久化的抽象接口, 具体实现使用 Sled

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::asset::AssetEntry;
use crate::domain::voice::{CharacterId, WorldId};

/// World Store 错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 世界存档快照
///
/// 只存跨次打开仍有意义的状态: 配音表、世界主题与资产条目。
/// 场景状态 (时段/天气/情境) 是瞬时的, 不入档。
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    pub world_id: WorldId,
    pub theme: Option<String>,
    pub cast_map: BTreeMap<CharacterId, String>,
    pub locations: Vec<AssetEntry>,
    pub characters: Vec<AssetEntry>,
    pub saved_at: DateTime<Utc>,
}

/// World Store Port
#[async_trait]
pub trait WorldStorePort: Send + Sync {
    /// 写入世界存档, 同一世界覆盖
    async fn save_world(&self, snapshot: &WorldSnapshot) -> Result<(), StoreError>;

    /// 读取世界存档
    async fn load_world(&self, world_id: &WorldId) -> Result<Option<WorldSnapshot>, StoreError>;

    /// 删除世界存档
    async fn delete_world(&self, world_id: &WorldId) -> Result<(), StoreError>;

    /// 列出所有存档的世界 ID
    async fn list_worlds(&self) -> Result<Vec<WorldId>, StoreError>;
}
