//! Static Catalog Source - 固定记录的目录来源
//!
//! 用于测试与嵌入场景, 不做任何 I/O

use async_trait::async_trait;

use crate::application::ports::{CatalogSourceError, CatalogSourcePort};
use crate::domain::voice::RawVoiceRecord;

/// 静态目录来源
pub struct StaticCatalogSource {
    source_id: String,
    records: Vec<RawVoiceRecord>,
}

impl StaticCatalogSource {
    pub fn new(source_id: impl Into<String>, records: Vec<RawVoiceRecord>) -> Self {
        Self {
            source_id: source_id.into(),
            records,
        }
    }
}

#[async_trait]
impl CatalogSourcePort for StaticCatalogSource {
    fn source_id(&self) -> String {
        format!("static:{}", self.source_id)
    }

    async fn fetch_records(&self) -> Result<Vec<RawVoiceRecord>, CatalogSourceError> {
        tracing::debug!(
            source = %self.source_id,
            records = self.records.len(),
            "StaticCatalogSource: returning fixed records"
        );
        Ok(self.records.clone())
    }
}
