//! World Manager Port - 世界会话生命周期管理
//!
//! 定义打开中世界的内存态管理接口, 具体实现在 infrastructure/memory 层

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::world_store::WorldSnapshot;
use crate::domain::asset::{AssetKind, AssetLibrary};
use crate::domain::voice::{CastingSession, WorldId};

/// World Manager 错误
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("World not open: {0}")]
    NotOpen(String),
}

/// 世界会话 (in-memory)
///
/// 一个打开中的世界的全部运行态: 配音表与视觉资产库。
/// 世界主题保存在 casting 内, 供配音评分使用。
#[derive(Debug, Clone)]
pub struct WorldSession {
    pub world_id: WorldId,
    /// 本次打开的实例标识, 日志用
    pub instance: Uuid,
    pub casting: CastingSession,
    pub assets: AssetLibrary,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl WorldSession {
    pub fn new(world_id: WorldId, theme: Option<String>) -> Self {
        Self::with_state(world_id, CastingSession::new(theme), AssetLibrary::new())
    }

    /// 从持久化状态重建会话
    pub fn with_state(world_id: WorldId, casting: CastingSession, assets: AssetLibrary) -> Self {
        let now = Utc::now();
        Self {
            world_id,
            instance: Uuid::new_v4(),
            casting,
            assets,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn theme(&self) -> Option<&str> {
        self.casting.world_theme()
    }

    /// 生成可持久化的快照 (场景状态不入档)
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            world_id: self.world_id.clone(),
            theme: self.theme().map(str::to_string),
            cast_map: self.casting.cast_map().clone(),
            locations: self.assets.entries(AssetKind::Location).to_vec(),
            characters: self.assets.entries(AssetKind::Character).to_vec(),
            saved_at: Utc::now(),
        }
    }
}

/// World Manager Port
///
/// 管理打开中世界的生命周期, 所有状态存储在内存中。
/// 同一世界的命令应当由调用方串行化。
pub trait WorldManagerPort: Send + Sync {
    /// 打开世界, 重开即重置: 同名世界已打开时旧会话被替换并返回
    fn open(&self, session: WorldSession) -> Option<WorldSession>;

    /// 获取世界会话的快照
    fn get(&self, world_id: &WorldId) -> Result<WorldSession, WorldError>;

    /// 写回配音表
    fn put_casting(&self, world_id: &WorldId, casting: CastingSession) -> Result<(), WorldError>;

    /// 写回资产库
    fn put_assets(&self, world_id: &WorldId, assets: AssetLibrary) -> Result<(), WorldError>;

    /// 世界是否打开中
    fn contains(&self, world_id: &WorldId) -> bool;

    /// 更新最后活动时间
    fn touch(&self, world_id: &WorldId);

    /// 关闭世界并返回最终状态
    fn close(&self, world_id: &WorldId) -> Result<WorldSession, WorldError>;

    /// 获取所有闲置超时的世界 ID
    fn expired_worlds(&self, idle_timeout_secs: u64) -> Vec<WorldId>;

    /// 获取所有打开中的世界 ID
    fn list_all(&self) -> Vec<WorldId>;
}
