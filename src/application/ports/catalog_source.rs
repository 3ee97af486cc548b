//! Catalog Source Port - 音色目录来源
//!
//! 定义目录拉取的抽象接口, 具体实现在 infrastructure/catalog 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::voice::RawVoiceRecord;

/// Catalog Source 错误
#[derive(Debug, Error)]
pub enum CatalogSourceError {
    #[error("Catalog source timeout: {0}")]
    Timeout(String),

    #[error("Catalog source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed catalog payload: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Catalog Source Port
///
/// 同一 source_id 的拉取结果可以被长期记忆化, 实现方保证
/// 该标识随来源配置变化。
#[async_trait]
pub trait CatalogSourcePort: Send + Sync {
    /// 来源的稳定标识, 作为记忆化键
    fn source_id(&self) -> String;

    /// 拉取全部原始目录记录
    async fn fetch_records(&self) -> Result<Vec<RawVoiceRecord>, CatalogSourceError>;
}
