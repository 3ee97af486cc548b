//! World Commands - 世界生命周期命令

use crate::domain::voice::WorldId;

/// 打开世界命令 - 有存档则恢复, 否则全新开始
#[derive(Debug, Clone)]
pub struct OpenWorldCommand {
    pub world_id: WorldId,
    /// 世界主题描述, 配音评分用; 与存档主题同时存在时以本值为准
    pub theme: Option<String>,
}

/// 打开世界响应
#[derive(Debug, Clone)]
pub struct OpenWorldResponse {
    pub world_id: WorldId,
    /// 是否从存档恢复
    pub restored: bool,
    pub cast_size: usize,
    pub location_count: usize,
    pub character_count: usize,
}

/// 关闭世界命令 - 写存档后移出内存
#[derive(Debug, Clone)]
pub struct CloseWorldCommand {
    pub world_id: WorldId,
}

/// 关闭世界响应
#[derive(Debug, Clone)]
pub struct CloseWorldResponse {
    pub world_id: WorldId,
    /// 存档是否写入成功
    pub persisted: bool,
}

/// 清扫闲置世界命令
#[derive(Debug, Clone)]
pub struct SweepWorldsCommand {
    pub idle_timeout_secs: u64,
}

/// 清扫闲置世界响应
#[derive(Debug, Clone)]
pub struct SweepWorldsResponse {
    /// 被关闭的世界 ID
    pub swept: Vec<WorldId>,
    /// 其中存档写入成功的数量
    pub persisted: usize,
}
