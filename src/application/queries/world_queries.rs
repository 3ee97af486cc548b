//! World Queries

use crate::domain::voice::WorldId;

/// 获取世界配音表查询
#[derive(Debug, Clone)]
pub struct GetCastList {
    pub world_id: WorldId,
}

/// 获取世界资产概况查询
#[derive(Debug, Clone)]
pub struct GetAssetSummary {
    pub world_id: WorldId,
}

/// 列出所有打开中世界查询
#[derive(Debug, Clone)]
pub struct ListOpenWorlds;
