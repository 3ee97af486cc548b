//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Casting Context: 角色配音分配
//! - Scene Context: 视觉资产缓存
//! - Audio Context: 音效类别匹配

pub mod asset;
pub mod audio;
pub mod voice;
