//! Stagehand - 互动小说配音与场景资产引擎
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Casting Context: 音色目录解析、角色 → 音色的会话稳定分配、调音与对白预处理
//! - Scene Context: 视觉资产缓存决策 (RETRIEVE / VARIATION / NEW_BASE)
//! - Audio Context: 音效/配乐类别匹配
//!
//! 应用层 (application/):
//! - Ports: 端口定义（CatalogSource, WorldManager, WorldStore, CueStore）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - Catalog: JSON 文件 / HTTP / 静态音色目录来源
//! - Memory: WorldManager 内存实现
//! - Persistence: Sled 世界存档与提示缓存
//!
//! 本 crate 是供编排层调用的库, 不带自己的对外网络接口:
//! 叙事生成、图像生成、语音合成都是外部协作方, 这里只负责
//! 决定"用哪个音色、哪张图能复用、哪段音效该生成"。

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
