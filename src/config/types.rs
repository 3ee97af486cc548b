//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 音色目录配置
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// 存储配置
    #[serde(default)]
    pub store: StoreConfig,

    /// 配音配置
    #[serde(default)]
    pub casting: CastingConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            store: StoreConfig::default(),
            casting: CastingConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 目录来源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSourceKind {
    /// 内置目录, 无外部依赖
    Embedded,
    /// 本地 JSON 文件
    File,
    /// 远端目录服务
    Http,
}

impl Default for CatalogSourceKind {
    fn default() -> Self {
        Self::Embedded
    }
}

/// 音色目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// 来源类型: embedded / file / http
    #[serde(default)]
    pub source: CatalogSourceKind,

    /// JSON 文件路径（source = file 时必填）
    #[serde(default)]
    pub path: Option<String>,

    /// 目录服务地址（source = http 时必填）
    #[serde(default)]
    pub endpoint: Option<String>,

    /// 可选的 API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// 拉取超时时间（秒）
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

fn default_catalog_timeout() -> u64 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSourceKind::default(),
            path: None,
            endpoint: None,
            api_key: None,
            timeout_secs: default_catalog_timeout(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// 数据目录, 世界存档与提示缓存都在其下
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// 提示缓存最大条目数
    #[serde(default = "default_max_cue_entries")]
    pub max_cue_entries: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_max_cue_entries() -> usize {
    64
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_cue_entries: default_max_cue_entries(),
        }
    }
}

impl StoreConfig {
    /// 世界存档数据库路径
    pub fn world_db_path(&self) -> PathBuf {
        self.data_dir.join("worlds.sled")
    }

    /// 提示缓存数据库路径
    pub fn cue_db_path(&self) -> PathBuf {
        self.data_dir.join("cues.sled")
    }
}

/// 配音配置
#[derive(Debug, Clone, Deserialize)]
pub struct CastingConfig {
    /// 评分决胜的随机种子, 不设则每次启动随机
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// 世界闲置超时（秒）
    #[serde(default = "default_world_idle")]
    pub world_idle_secs: u64,
}

fn default_world_idle() -> u64 {
    3600
}

impl Default for CastingConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            world_idle_secs: default_world_idle(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.source, CatalogSourceKind::Embedded);
        assert_eq!(config.catalog.timeout_secs, 10);
        assert_eq!(config.store.max_cue_entries, 64);
        assert_eq!(config.casting.world_idle_secs, 3600);
        assert!(config.casting.rng_seed.is_none());
        assert_eq!(config.log.level, "info");
        assert!(!config.log.json);
    }

    #[test]
    fn test_store_paths() {
        let config = StoreConfig::default();
        assert_eq!(config.world_db_path(), PathBuf::from("data/worlds.sled"));
        assert_eq!(config.cue_db_path(), PathBuf::from("data/cues.sled"));
    }

    #[test]
    fn test_source_kind_from_json() {
        let config: CatalogConfig =
            serde_json::from_str(r#"{"source": "http", "endpoint": "http://localhost:8100/voices"}"#)
                .unwrap();
        assert_eq!(config.source, CatalogSourceKind::Http);
        assert_eq!(config.timeout_secs, 10);
    }
}
