//! Scene Commands - 场景与视觉资产相关命令

use crate::domain::asset::{AssetKind, CacheDecision, SaveOutcome, TimeOfDay, Weather};
use crate::domain::voice::WorldId;

/// 更新场景状态命令, None 字段保持原值
#[derive(Debug, Clone)]
pub struct UpdateSceneCommand {
    pub world_id: WorldId,
    pub time: Option<TimeOfDay>,
    pub weather: Option<Weather>,
    pub event: Option<String>,
}

/// 更新场景状态响应
#[derive(Debug, Clone)]
pub struct UpdateSceneResponse {
    pub world_id: WorldId,
    /// 更新后的当前状态键
    pub state_key: String,
}

/// 资产决策命令 - 判定取缓存/派生变体/生成新图
#[derive(Debug, Clone)]
pub struct DecideAssetCommand {
    pub world_id: WorldId,
    pub kind: AssetKind,
    /// 叙事中的资产名, 支持模糊匹配
    pub name: String,
    /// 显式状态键, 缺省时用世界当前场景
    pub state_key: Option<String>,
}

/// 资产决策响应
#[derive(Debug, Clone)]
pub struct DecideAssetResponse {
    pub decision: CacheDecision,
}

/// 新资产入库命令
#[derive(Debug, Clone)]
pub struct SaveAssetCommand {
    pub world_id: WorldId,
    pub kind: AssetKind,
    pub asset_id: String,
    pub display_name: String,
    pub image_ref: String,
    /// 基础图对应的状态键, 缺省时用世界当前场景
    pub state_key: Option<String>,
}

/// 新资产入库响应
#[derive(Debug, Clone)]
pub struct SaveAssetResponse {
    pub asset_id: String,
    pub outcome: SaveOutcome,
}

/// 状态变体入库命令
#[derive(Debug, Clone)]
pub struct SaveVariationCommand {
    pub world_id: WorldId,
    pub kind: AssetKind,
    pub asset_id: String,
    pub state_key: String,
    pub image_url: String,
}

/// 状态变体入库响应
#[derive(Debug, Clone)]
pub struct SaveVariationResponse {
    pub asset_id: String,
    pub outcome: SaveOutcome,
}

/// 清空资产命令 - 场景状态保留
#[derive(Debug, Clone)]
pub struct ClearAssetsCommand {
    pub world_id: WorldId,
}

/// 清空资产响应
#[derive(Debug, Clone)]
pub struct ClearAssetsResponse {
    pub world_id: WorldId,
}
