//! HTTP Catalog Source - 调用远端音色目录服务
//!
//! GET {endpoint}, 响应为目录记录的 JSON 数组, 字段名兼容
//! 供应商导出格式。可选 API key 经 X-Api-Key 头传递。

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{CatalogSourceError, CatalogSourcePort};
use crate::domain::voice::RawVoiceRecord;

/// 响应内记录
#[derive(Debug, Deserialize)]
struct WireVoiceRecord {
    #[serde(alias = "speaker_uuid")]
    id: String,
    #[serde(alias = "speaker_name")]
    label: String,
    description: String,
}

/// HTTP 目录来源配置
#[derive(Debug, Clone)]
pub struct HttpCatalogSourceConfig {
    /// 目录服务地址
    pub endpoint: String,
    /// 可选的 API key
    pub api_key: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpCatalogSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8100/voices".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl HttpCatalogSourceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// HTTP 目录来源
pub struct HttpCatalogSource {
    client: Client,
    config: HttpCatalogSourceConfig,
}

impl HttpCatalogSource {
    pub fn new(config: HttpCatalogSourceConfig) -> Result<Self, CatalogSourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogSourceError::Unavailable(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CatalogSourcePort for HttpCatalogSource {
    fn source_id(&self) -> String {
        format!("http:{}", self.config.endpoint)
    }

    async fn fetch_records(&self) -> Result<Vec<RawVoiceRecord>, CatalogSourceError> {
        tracing::debug!(url = %self.config.endpoint, "Fetching voice catalog");

        let mut request = self.client.get(&self.config.endpoint);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("X-Api-Key", api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CatalogSourceError::Timeout(self.config.endpoint.clone())
            } else if e.is_connect() {
                CatalogSourceError::Unavailable(format!(
                    "Cannot connect to catalog service: {}",
                    e
                ))
            } else {
                CatalogSourceError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogSourceError::Unavailable(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let records: Vec<WireVoiceRecord> = response
            .json()
            .await
            .map_err(|e| CatalogSourceError::Malformed(e.to_string()))?;

        tracing::info!(
            url = %self.config.endpoint,
            records = records.len(),
            "Voice catalog fetched"
        );

        Ok(records
            .into_iter()
            .map(|record| RawVoiceRecord {
                id: record.id,
                label: record.label,
                description: record.description,
            })
            .collect())
    }
}
