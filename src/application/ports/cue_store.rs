//! Cue Store Port - 音频提示缓存
//!
//! 定义按类别缓存生成音频的抽象接口, 具体实现使用 Sled。
//! 同一类别 ID 只保留一段音频, 重复入库覆盖。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::audio::CueKind;

/// Cue Store 错误
#[derive(Debug, Error)]
pub enum CueStoreError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// 缓存的音频片段
#[derive(Debug, Clone)]
pub struct CueClip {
    pub category_id: String,
    pub kind: CueKind,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    pub use_count: u64,
}

impl CueClip {
    pub fn new(category_id: String, kind: CueKind, url: String) -> Self {
        let now = Utc::now();
        Self {
            category_id,
            kind,
            url,
            created_at: now,
            last_used_at: now,
            use_count: 1,
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Default)]
pub struct CueStoreStats {
    pub total_entries: usize,
    pub max_entries: usize,
}

/// Cue Store Port
#[async_trait]
pub trait CueStorePort: Send + Sync {
    /// 按类别 ID 取缓存片段
    async fn get(&self, category_id: &str) -> Result<Option<CueClip>, CueStoreError>;

    /// 写入片段, 超出容量时按 created_at 淘汰最旧条目
    async fn put(&self, clip: CueClip) -> Result<(), CueStoreError>;

    /// 命中登记: use_count 加一并刷新 last_used_at
    async fn touch(&self, category_id: &str) -> Result<(), CueStoreError>;

    /// 获取缓存统计信息
    async fn stats(&self) -> CueStoreStats;
}
