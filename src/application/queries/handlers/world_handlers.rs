//! World Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::WorldManagerPort;
use crate::application::queries::{GetAssetSummary, GetCastList, ListOpenWorlds};
use crate::domain::asset::AssetKind;

// ============================================================================
// Response DTOs
// ============================================================================

/// 配音表条目
#[derive(Debug, Clone)]
pub struct CastEntryView {
    pub character: String,
    pub base_identity: String,
}

/// 配音表响应
#[derive(Debug, Clone)]
pub struct CastListResponse {
    pub world_id: String,
    pub theme: Option<String>,
    pub entries: Vec<CastEntryView>,
}

/// 资产概况响应
#[derive(Debug, Clone)]
pub struct AssetSummaryResponse {
    pub world_id: String,
    pub state_key: String,
    pub locations: Vec<String>,
    pub characters: Vec<String>,
}

/// 打开中世界概况响应
#[derive(Debug, Clone)]
pub struct WorldSummaryResponse {
    pub world_id: String,
    pub theme: Option<String>,
    pub cast_size: usize,
    pub location_count: usize,
    pub character_count: usize,
    pub last_activity: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetCastList Handler
pub struct GetCastListHandler {
    world_manager: Arc<dyn WorldManagerPort>,
}

impl GetCastListHandler {
    pub fn new(world_manager: Arc<dyn WorldManagerPort>) -> Self {
        Self { world_manager }
    }

    pub async fn handle(&self, query: GetCastList) -> Result<CastListResponse, ApplicationError> {
        let session = self
            .world_manager
            .get(&query.world_id)
            .map_err(|_| ApplicationError::not_found("World", query.world_id.as_str()))?;

        let entries = session
            .casting
            .cast_map()
            .iter()
            .map(|(character, identity)| CastEntryView {
                character: character.as_str().to_string(),
                base_identity: identity.clone(),
            })
            .collect();

        Ok(CastListResponse {
            world_id: query.world_id.as_str().to_string(),
            theme: session.theme().map(str::to_string),
            entries,
        })
    }
}

/// GetAssetSummary Handler
pub struct GetAssetSummaryHandler {
    world_manager: Arc<dyn WorldManagerPort>,
}

impl GetAssetSummaryHandler {
    pub fn new(world_manager: Arc<dyn WorldManagerPort>) -> Self {
        Self { world_manager }
    }

    pub async fn handle(&self, query: GetAssetSummary) -> Result<AssetSummaryResponse, ApplicationError> {
        let session = self
            .world_manager
            .get(&query.world_id)
            .map_err(|_| ApplicationError::not_found("World", query.world_id.as_str()))?;

        Ok(AssetSummaryResponse {
            world_id: query.world_id.as_str().to_string(),
            state_key: session.assets.current_state_key().to_string(),
            locations: session.assets.display_names(AssetKind::Location),
            characters: session.assets.display_names(AssetKind::Character),
        })
    }
}

/// ListOpenWorlds Handler
pub struct ListOpenWorldsHandler {
    world_manager: Arc<dyn WorldManagerPort>,
}

impl ListOpenWorldsHandler {
    pub fn new(world_manager: Arc<dyn WorldManagerPort>) -> Self {
        Self { world_manager }
    }

    pub async fn handle(&self, _query: ListOpenWorlds) -> Result<Vec<WorldSummaryResponse>, ApplicationError> {
        let summaries = self
            .world_manager
            .list_all()
            .into_iter()
            // 列举与读取之间世界可能被关闭, 静默跳过
            .filter_map(|world_id| self.world_manager.get(&world_id).ok())
            .map(|session| WorldSummaryResponse {
                world_id: session.world_id.as_str().to_string(),
                theme: session.theme().map(str::to_string),
                cast_size: session.casting.cast_size(),
                location_count: session.assets.entries(AssetKind::Location).len(),
                character_count: session.assets.entries(AssetKind::Character).len(),
                last_activity: session.last_activity.to_rfc3339(),
            })
            .collect();

        Ok(summaries)
    }
}
