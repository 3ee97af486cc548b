//! Catalog Loader - 目录加载与记忆化
//!
//! 目录按来源标识记忆化, 同一来源只解析一次。拉取失败退回
//! 内置目录, 失败结果不记忆化, 下次调用重试来源。

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;

use crate::application::ports::CatalogSourcePort;
use crate::domain::voice::{parse_voice_label, RawVoiceRecord, VoiceCatalog, NEUTRAL_EMOTION};

/// 入库前审计, 跳过规则与目录构建一致
fn audit_records(source: &str, records: &[RawVoiceRecord]) {
    let mut emotion_counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    let mut neutral_seen: BTreeMap<String, bool> = BTreeMap::new();

    for raw in records {
        if raw.id.trim().is_empty() {
            continue;
        }
        let (identity, emotion) = parse_voice_label(&raw.label);
        if identity.is_empty() {
            continue;
        }
        let neutral = neutral_seen.entry(identity.clone()).or_insert(false);
        *neutral |= emotion == NEUTRAL_EMOTION;
        *emotion_counts.entry((identity, emotion)).or_insert(0) += 1;
    }

    for ((identity, emotion), count) in &emotion_counts {
        if *count > 1 {
            tracing::warn!(
                source = %source,
                identity = %identity,
                emotion = %emotion,
                records = count,
                "Duplicate emotion variant in catalog source, last record wins"
            );
        }
    }
    for (identity, has_neutral) in &neutral_seen {
        if !has_neutral {
            tracing::warn!(
                source = %source,
                identity = %identity,
                "Identity lacks a neutral variant, first record aliased as neutral"
            );
        }
    }
}

pub struct CatalogLoader {
    source: Arc<dyn CatalogSourcePort>,
    loaded: DashMap<String, Arc<VoiceCatalog>>,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSourcePort>) -> Self {
        Self {
            source,
            loaded: DashMap::new(),
        }
    }

    /// 加载目录, 整体不可失败
    ///
    /// 并发的首次加载可能重复拉取, 后写者覆盖, 结果等价。
    pub async fn load(&self) -> Arc<VoiceCatalog> {
        let key = self.source.source_id();
        if let Some(hit) = self.loaded.get(&key) {
            return hit.clone();
        }

        match self.source.fetch_records().await {
            Ok(records) => {
                let record_count = records.len();
                audit_records(&key, &records);
                let catalog = Arc::new(VoiceCatalog::from_records(records));
                // 来源为空或全部畸形同样退回内置目录
                if catalog.is_empty() {
                    tracing::warn!(
                        source = %key,
                        records = record_count,
                        "Catalog source yielded no usable records, using embedded catalog"
                    );
                    return Arc::new(VoiceCatalog::embedded());
                }
                tracing::info!(
                    source = %key,
                    records = record_count,
                    identities = catalog.len(),
                    "Voice catalog loaded"
                );
                self.loaded.insert(key, catalog.clone());
                catalog
            }
            Err(err) => {
                tracing::warn!(
                    source = %key,
                    error = %err,
                    "Catalog fetch failed, using embedded catalog"
                );
                Arc::new(VoiceCatalog::embedded())
            }
        }
    }

    /// 丢弃记忆化结果, 下次 load 重新拉取
    pub fn invalidate(&self) {
        self.loaded.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::application::ports::CatalogSourceError;
    use crate::domain::voice::RawVoiceRecord;

    /// 记录拉取次数的假来源
    struct CountingSource {
        fetches: AtomicUsize,
        fail: bool,
        records: Vec<RawVoiceRecord>,
    }

    impl CountingSource {
        fn ok(records: Vec<RawVoiceRecord>) -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                fail: false,
                records,
            }
        }

        fn failing() -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                fail: true,
                records: Vec::new(),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogSourcePort for CountingSource {
        fn source_id(&self) -> String {
            "test:counting".to_string()
        }

        async fn fetch_records(&self) -> Result<Vec<RawVoiceRecord>, CatalogSourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CatalogSourceError::Unavailable("test outage".to_string()));
            }
            Ok(self.records.clone())
        }
    }

    fn sample_records() -> Vec<RawVoiceRecord> {
        vec![RawVoiceRecord {
            id: "v-1".to_string(),
            label: "가레스(중립)".to_string(),
            description: "남성, 중년, 저음, 맑음".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_load_memoizes_by_source_id() {
        let source = Arc::new(CountingSource::ok(sample_records()));
        let loader = CatalogLoader::new(source.clone());

        let first = loader.load().await;
        let second = loader.load().await;

        assert_eq!(source.fetch_count(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.contains("가레스"));
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back_and_retries() {
        let source = Arc::new(CountingSource::failing());
        let loader = CatalogLoader::new(source.clone());

        let catalog = loader.load().await;
        assert_eq!(catalog.len(), VoiceCatalog::embedded().len());

        // 失败不记忆化, 再次加载会重试来源
        loader.load().await;
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_source_falls_back_to_embedded() {
        let source = Arc::new(CountingSource::ok(Vec::new()));
        let loader = CatalogLoader::new(source.clone());

        let catalog = loader.load().await;

        assert!(!catalog.is_empty());
        assert!(catalog.contains("니마라"));
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let source = Arc::new(CountingSource::ok(sample_records()));
        let loader = CatalogLoader::new(source.clone());

        loader.load().await;
        loader.invalidate();
        loader.load().await;

        assert_eq!(source.fetch_count(), 2);
    }
}
