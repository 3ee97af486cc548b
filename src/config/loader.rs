//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（stagehand.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, CatalogSourceKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["stagehand", "stagehand.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `STAGEHAND_`，层级分隔符 `__`）
/// 2. 配置文件（stagehand.toml 或 stagehand.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `STAGEHAND_CATALOG__SOURCE=http`
/// - `STAGEHAND_CATALOG__ENDPOINT=http://voices:8100/voices`
/// - `STAGEHAND_STORE__DATA_DIR=/data/stagehand`
/// - `STAGEHAND_CASTING__RNG_SEED=42`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// 传入 `None` 时按 [`CONFIG_FILE_NAMES`] 搜索当前目录。
pub fn load_config_from_path(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        // 目录默认值
        .set_default("catalog.source", "embedded")?
        .set_default("catalog.timeout_secs", 10)?
        // 存储默认值
        .set_default("store.data_dir", "data")?
        .set_default("store.max_cue_entries", 64)?
        // 配音默认值
        .set_default("casting.world_idle_secs", 3600)?
        // 日志默认值
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 配置文件来源: 显式路径必须存在, 搜索路径允许缺失
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 环境变量覆盖
    builder = builder.add_source(
        Environment::with_prefix("STAGEHAND")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|err| ConfigError::ParseError(err.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 校验配置合法性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.catalog.source == CatalogSourceKind::File
        && config.catalog.path.as_deref().map_or(true, |p| p.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "Catalog path is required when source is file".to_string(),
        ));
    }

    if config.catalog.source == CatalogSourceKind::Http
        && config
            .catalog
            .endpoint
            .as_deref()
            .map_or(true, |e| e.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "Catalog endpoint is required when source is http".to_string(),
        ));
    }

    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Catalog timeout cannot be 0".to_string(),
        ));
    }

    if config.store.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Data directory cannot be empty".to_string(),
        ));
    }

    if config.store.max_cue_entries == 0 {
        return Err(ConfigError::ValidationError(
            "Max cue entries cannot be 0".to_string(),
        ));
    }

    if config.casting.world_idle_secs == 0 {
        return Err(ConfigError::ValidationError(
            "World idle timeout cannot be 0".to_string(),
        ));
    }

    if config.log.level.is_empty() {
        return Err(ConfigError::ValidationError(
            "Log level cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置摘要（敏感字段不输出）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Catalog Source: {:?}", config.catalog.source);
    if let Some(path) = &config.catalog.path {
        tracing::info!("Catalog Path: {}", path);
    }
    if let Some(endpoint) = &config.catalog.endpoint {
        tracing::info!("Catalog Endpoint: {}", endpoint);
    }
    tracing::info!("Catalog Timeout: {}s", config.catalog.timeout_secs);
    tracing::info!("Data Directory: {}", config.store.data_dir.display());
    tracing::info!("Max Cue Entries: {}", config.store.max_cue_entries);
    if let Some(seed) = config.casting.rng_seed {
        tracing::info!("Casting RNG Seed: {}", seed);
    }
    tracing::info!("World Idle Timeout: {}s", config.casting.world_idle_secs);
    tracing::info!("Log Level: {} (json: {})", config.log.level, config.log.json);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_file_source_requires_path() {
        let mut config = AppConfig::default();
        config.catalog.source = CatalogSourceKind::File;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        config.catalog.path = Some("voices/catalog.json".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_http_source_requires_endpoint() {
        let mut config = AppConfig::default();
        config.catalog.source = CatalogSourceKind::Http;
        config.catalog.endpoint = Some("   ".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        config.catalog.endpoint = Some("http://localhost:8100/voices".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = AppConfig::default();
        config.catalog.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_cue_capacity_rejected() {
        let mut config = AppConfig::default();
        config.store.max_cue_entries = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_idle_timeout_rejected() {
        let mut config = AppConfig::default();
        config.casting.world_idle_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
