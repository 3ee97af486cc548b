//! Scene Context - 场景限界上下文
//!
//! 职责:
//! - 场景状态 (时段/天气/情境) 与状态键
//! - 视觉资产缓存与 RETRIEVE/VARIATION/NEW_BASE 决策

mod library;
mod value_objects;

pub use library::{
    is_error_image, suggest_asset_id, AssetEntry, AssetLibrary, CacheDecision, SaveOutcome,
};
pub use value_objects::{AssetKind, SceneState, ScenePatch, StateKey, TimeOfDay, Weather};
