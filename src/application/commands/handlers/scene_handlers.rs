//! Scene Command Handlers

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;

use crate::application::commands::scene_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{WorldManagerPort, WorldSnapshot, WorldStorePort};
use crate::domain::asset::{CacheDecision, SaveOutcome, ScenePatch, StateKey};

/// 资产落库后的存档写入, 失败降级为警告
async fn persist_assets(world_store: &Arc<dyn WorldStorePort>, snapshot: &WorldSnapshot) {
    if let Err(err) = world_store.save_world(snapshot).await {
        tracing::warn!(
            world_id = %snapshot.world_id,
            error = %err,
            "Asset snapshot write failed"
        );
    }
}

/// UpdateScene Handler - 部分更新场景状态
///
/// 场景状态只存在于内存会话, 不触发存档写入。
pub struct UpdateSceneHandler {
    world_manager: Arc<dyn WorldManagerPort>,
}

impl UpdateSceneHandler {
    pub fn new(world_manager: Arc<dyn WorldManagerPort>) -> Self {
        Self { world_manager }
    }

    pub async fn handle(&self, cmd: UpdateSceneCommand) -> Result<UpdateSceneResponse, ApplicationError> {
        let mut session = self
            .world_manager
            .get(&cmd.world_id)
            .map_err(|_| ApplicationError::not_found("World", cmd.world_id.as_str()))?;

        session.assets.update_scene(ScenePatch {
            time: cmd.time,
            weather: cmd.weather,
            event: cmd.event,
        });
        let state_key = session.assets.current_state_key();

        self.world_manager
            .put_assets(&cmd.world_id, session.assets)
            .map_err(|_| ApplicationError::not_found("World", cmd.world_id.as_str()))?;

        tracing::info!(
            world_id = %cmd.world_id,
            state_key = %state_key,
            "Scene state updated"
        );

        Ok(UpdateSceneResponse {
            world_id: cmd.world_id,
            state_key: state_key.to_string(),
        })
    }
}

/// DecideAsset Handler - 缓存决策, 不修改库
pub struct DecideAssetHandler {
    world_manager: Arc<dyn WorldManagerPort>,
    rng: Mutex<StdRng>,
}

impl DecideAssetHandler {
    pub fn new(world_manager: Arc<dyn WorldManagerPort>, rng: StdRng) -> Self {
        Self {
            world_manager,
            rng: Mutex::new(rng),
        }
    }

    pub async fn handle(&self, cmd: DecideAssetCommand) -> Result<DecideAssetResponse, ApplicationError> {
        if cmd.name.trim().is_empty() {
            return Err(ApplicationError::validation("Asset name must not be empty"));
        }

        let session = self
            .world_manager
            .get(&cmd.world_id)
            .map_err(|_| ApplicationError::not_found("World", cmd.world_id.as_str()))?;

        let state_key = cmd.state_key.map(StateKey::raw);
        let decision = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            session.assets.decide(cmd.kind, &cmd.name, state_key, &mut rng)
        };
        self.world_manager.touch(&cmd.world_id);

        match &decision {
            CacheDecision::Retrieve { asset_id, state_key, .. } => {
                tracing::debug!(
                    world_id = %cmd.world_id,
                    asset_id = %asset_id,
                    state_key = %state_key,
                    "Asset cache hit"
                );
            }
            CacheDecision::Variation { asset_id, new_state_key, .. } => {
                tracing::info!(
                    world_id = %cmd.world_id,
                    asset_id = %asset_id,
                    state_key = %new_state_key,
                    "Asset variation needed"
                );
            }
            CacheDecision::NewBase { suggested_id, state_key } => {
                tracing::info!(
                    world_id = %cmd.world_id,
                    name = %cmd.name,
                    suggested_id = %suggested_id,
                    state_key = %state_key,
                    "New base asset needed"
                );
            }
        }

        Ok(DecideAssetResponse { decision })
    }
}

/// SaveAsset Handler - 新资产入库
pub struct SaveAssetHandler {
    world_manager: Arc<dyn WorldManagerPort>,
    world_store: Arc<dyn WorldStorePort>,
}

impl SaveAssetHandler {
    pub fn new(world_manager: Arc<dyn WorldManagerPort>, world_store: Arc<dyn WorldStorePort>) -> Self {
        Self {
            world_manager,
            world_store,
        }
    }

    pub async fn handle(&self, cmd: SaveAssetCommand) -> Result<SaveAssetResponse, ApplicationError> {
        if cmd.asset_id.trim().is_empty() {
            return Err(ApplicationError::validation("Asset id must not be empty"));
        }
        if cmd.display_name.trim().is_empty() {
            return Err(ApplicationError::validation("Asset name must not be empty"));
        }

        let mut session = self
            .world_manager
            .get(&cmd.world_id)
            .map_err(|_| ApplicationError::not_found("World", cmd.world_id.as_str()))?;

        let state_key = cmd
            .state_key
            .map(StateKey::raw)
            .unwrap_or_else(|| session.assets.current_state_key());
        let outcome = session.assets.save_new_asset(
            cmd.kind,
            cmd.asset_id.clone(),
            cmd.display_name,
            cmd.image_ref,
            state_key.clone(),
        );

        match outcome {
            SaveOutcome::Stored => {
                let snapshot = session.snapshot();
                self.world_manager
                    .put_assets(&cmd.world_id, session.assets)
                    .map_err(|_| ApplicationError::not_found("World", cmd.world_id.as_str()))?;
                tracing::info!(
                    world_id = %cmd.world_id,
                    asset_id = %cmd.asset_id,
                    kind = cmd.kind.label(),
                    state_key = %state_key,
                    "New asset stored"
                );
                persist_assets(&self.world_store, &snapshot).await;
            }
            SaveOutcome::RejectedSentinel => {
                tracing::warn!(
                    world_id = %cmd.world_id,
                    asset_id = %cmd.asset_id,
                    "Rejected error placeholder image"
                );
            }
            SaveOutcome::UnknownAsset => {}
        }

        Ok(SaveAssetResponse {
            asset_id: cmd.asset_id,
            outcome,
        })
    }
}

/// SaveVariation Handler - 状态变体入库
pub struct SaveVariationHandler {
    world_manager: Arc<dyn WorldManagerPort>,
    world_store: Arc<dyn WorldStorePort>,
}

impl SaveVariationHandler {
    pub fn new(world_manager: Arc<dyn WorldManagerPort>, world_store: Arc<dyn WorldStorePort>) -> Self {
        Self {
            world_manager,
            world_store,
        }
    }

    pub async fn handle(&self, cmd: SaveVariationCommand) -> Result<SaveVariationResponse, ApplicationError> {
        if cmd.state_key.trim().is_empty() {
            return Err(ApplicationError::validation("State key must not be empty"));
        }

        let mut session = self
            .world_manager
            .get(&cmd.world_id)
            .map_err(|_| ApplicationError::not_found("World", cmd.world_id.as_str()))?;

        let state_key = StateKey::raw(cmd.state_key);
        let outcome = session.assets.save_variation(
            cmd.kind,
            &cmd.asset_id,
            state_key.clone(),
            cmd.image_url,
        );

        match outcome {
            SaveOutcome::Stored => {
                let snapshot = session.snapshot();
                self.world_manager
                    .put_assets(&cmd.world_id, session.assets)
                    .map_err(|_| ApplicationError::not_found("World", cmd.world_id.as_str()))?;
                tracing::info!(
                    world_id = %cmd.world_id,
                    asset_id = %cmd.asset_id,
                    state_key = %state_key,
                    "Asset variation stored"
                );
                persist_assets(&self.world_store, &snapshot).await;
            }
            SaveOutcome::RejectedSentinel => {
                tracing::warn!(
                    world_id = %cmd.world_id,
                    asset_id = %cmd.asset_id,
                    "Rejected error placeholder image"
                );
            }
            SaveOutcome::UnknownAsset => {
                tracing::warn!(
                    world_id = %cmd.world_id,
                    asset_id = %cmd.asset_id,
                    "Variation for unknown asset ignored"
                );
            }
        }

        Ok(SaveVariationResponse {
            asset_id: cmd.asset_id,
            outcome,
        })
    }
}

/// ClearAssets Handler - 清空资产库
pub struct ClearAssetsHandler {
    world_manager: Arc<dyn WorldManagerPort>,
    world_store: Arc<dyn WorldStorePort>,
}

impl ClearAssetsHandler {
    pub fn new(world_manager: Arc<dyn WorldManagerPort>, world_store: Arc<dyn WorldStorePort>) -> Self {
        Self {
            world_manager,
            world_store,
        }
    }

    pub async fn handle(&self, cmd: ClearAssetsCommand) -> Result<ClearAssetsResponse, ApplicationError> {
        let mut session = self
            .world_manager
            .get(&cmd.world_id)
            .map_err(|_| ApplicationError::not_found("World", cmd.world_id.as_str()))?;

        session.assets.clear();
        let snapshot = session.snapshot();
        self.world_manager
            .put_assets(&cmd.world_id, session.assets)
            .map_err(|_| ApplicationError::not_found("World", cmd.world_id.as_str()))?;

        tracing::info!(world_id = %cmd.world_id, "Asset library cleared");
        persist_assets(&self.world_store, &snapshot).await;

        Ok(ClearAssetsResponse {
            world_id: cmd.world_id,
        })
    }
}
