//! JSON File Catalog Source
//!
//! 从本地 JSON 文件读取目录记录。文件是 JSON 数组, 字段名兼容
//! 供应商导出格式 (speaker_uuid / speaker_name), 多余字段忽略。

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

use crate::application::ports::{CatalogSourceError, CatalogSourcePort};
use crate::domain::voice::RawVoiceRecord;

/// 文件内记录
#[derive(Debug, Deserialize)]
struct FileVoiceRecord {
    #[serde(alias = "speaker_uuid")]
    id: String,
    #[serde(alias = "speaker_name")]
    label: String,
    description: String,
}

impl From<FileVoiceRecord> for RawVoiceRecord {
    fn from(record: FileVoiceRecord) -> Self {
        Self {
            id: record.id,
            label: record.label,
            description: record.description,
        }
    }
}

/// JSON 文件目录来源
pub struct JsonFileCatalogSource {
    path: PathBuf,
}

impl JsonFileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSourcePort for JsonFileCatalogSource {
    fn source_id(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn fetch_records(&self) -> Result<Vec<RawVoiceRecord>, CatalogSourceError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            CatalogSourceError::IoError(format!("{}: {}", self.path.display(), e))
        })?;

        let records: Vec<FileVoiceRecord> = serde_json::from_slice(&bytes)
            .map_err(|e| CatalogSourceError::Malformed(e.to_string()))?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "Catalog file loaded"
        );

        Ok(records.into_iter().map(RawVoiceRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_fetch_vendor_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("voices.json");
        std::fs::write(
            &path,
            r#"[
                {"no": 1, "speaker_uuid": "uuid-1", "speaker_name": "가레스", "saas_name": null, "description": "남성, 중년, 저음, 굵음, 차분한"},
                {"no": 2, "speaker_uuid": "uuid-2", "speaker_name": "가레스(분노)", "saas_name": null, "description": "남성, 중년, 저음, 굵음, 격앙된"}
            ]"#,
        )
        .unwrap();

        let source = JsonFileCatalogSource::new(&path);
        let records = source.fetch_records().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "uuid-1");
        assert_eq!(records[0].label, "가레스");
        assert_eq!(records[1].label, "가레스(분노)");
    }

    #[tokio::test]
    async fn test_fetch_plain_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("voices.json");
        std::fs::write(
            &path,
            r#"[{"id": "v1", "label": "리나", "description": "여성, 청년, 고음, 맑음, 발랄한"}]"#,
        )
        .unwrap();

        let source = JsonFileCatalogSource::new(&path);
        let records = source.fetch_records().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "v1");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let source = JsonFileCatalogSource::new(dir.path().join("absent.json"));

        let err = source.fetch_records().await.unwrap_err();
        assert!(matches!(err, CatalogSourceError::IoError(_)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("voices.json");
        std::fs::write(&path, "{not json").unwrap();

        let source = JsonFileCatalogSource::new(&path);
        let err = source.fetch_records().await.unwrap_err();
        assert!(matches!(err, CatalogSourceError::Malformed(_)));
    }
}
