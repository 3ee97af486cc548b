//! World Command Handlers

use std::sync::Arc;

use crate::application::commands::world_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{WorldManagerPort, WorldSession, WorldStorePort};
use crate::domain::asset::{AssetKind, AssetLibrary};
use crate::domain::voice::CastingSession;

/// OpenWorld Handler - 有存档则恢复, 否则全新开始
///
/// 重开已打开的世界等同重置: 旧内存会话被替换, 未存档的状态丢弃。
pub struct OpenWorldHandler {
    world_manager: Arc<dyn WorldManagerPort>,
    world_store: Arc<dyn WorldStorePort>,
}

impl OpenWorldHandler {
    pub fn new(world_manager: Arc<dyn WorldManagerPort>, world_store: Arc<dyn WorldStorePort>) -> Self {
        Self {
            world_manager,
            world_store,
        }
    }

    pub async fn handle(&self, cmd: OpenWorldCommand) -> Result<OpenWorldResponse, ApplicationError> {
        // 读存档, 失败降级为全新开始
        let snapshot = match self.world_store.load_world(&cmd.world_id).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(
                    world_id = %cmd.world_id,
                    error = %err,
                    "World archive unreadable, starting fresh"
                );
                None
            }
        };

        let (session, restored) = match snapshot {
            Some(snapshot) => {
                let theme = cmd.theme.clone().or(snapshot.theme);
                let casting = CastingSession::restore(snapshot.cast_map, theme);
                let assets = AssetLibrary::restore(snapshot.locations, snapshot.characters);
                (
                    WorldSession::with_state(cmd.world_id.clone(), casting, assets),
                    true,
                )
            }
            None => (
                WorldSession::new(cmd.world_id.clone(), cmd.theme.clone()),
                false,
            ),
        };

        let cast_size = session.casting.cast_size();
        let location_count = session.assets.entries(AssetKind::Location).len();
        let character_count = session.assets.entries(AssetKind::Character).len();
        let instance = session.instance;

        if let Some(replaced) = self.world_manager.open(session) {
            tracing::info!(
                world_id = %cmd.world_id,
                previous_instance = %replaced.instance,
                "World reopened, previous session replaced"
            );
        }

        tracing::info!(
            world_id = %cmd.world_id,
            instance = %instance,
            restored = restored,
            cast_size = cast_size,
            locations = location_count,
            characters = character_count,
            "World opened"
        );

        Ok(OpenWorldResponse {
            world_id: cmd.world_id,
            restored,
            cast_size,
            location_count,
            character_count,
        })
    }
}

/// CloseWorld Handler - 写存档后移出内存
///
/// 存档写入失败不阻止关闭, 以 persisted 标记回报。
pub struct CloseWorldHandler {
    world_manager: Arc<dyn WorldManagerPort>,
    world_store: Arc<dyn WorldStorePort>,
}

impl CloseWorldHandler {
    pub fn new(world_manager: Arc<dyn WorldManagerPort>, world_store: Arc<dyn WorldStorePort>) -> Self {
        Self {
            world_manager,
            world_store,
        }
    }

    pub async fn handle(&self, cmd: CloseWorldCommand) -> Result<CloseWorldResponse, ApplicationError> {
        let session = self
            .world_manager
            .close(&cmd.world_id)
            .map_err(|_| ApplicationError::not_found("World", cmd.world_id.as_str()))?;

        let snapshot = session.snapshot();
        let persisted = match self.world_store.save_world(&snapshot).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    world_id = %cmd.world_id,
                    error = %err,
                    "World archive write failed"
                );
                false
            }
        };

        tracing::info!(
            world_id = %cmd.world_id,
            cast_size = session.casting.cast_size(),
            persisted = persisted,
            "World closed"
        );

        Ok(CloseWorldResponse {
            world_id: cmd.world_id,
            persisted,
        })
    }
}

/// SweepWorlds Handler - 关闭并存档所有闲置超时的世界
pub struct SweepWorldsHandler {
    world_manager: Arc<dyn WorldManagerPort>,
    world_store: Arc<dyn WorldStorePort>,
}

impl SweepWorldsHandler {
    pub fn new(world_manager: Arc<dyn WorldManagerPort>, world_store: Arc<dyn WorldStorePort>) -> Self {
        Self {
            world_manager,
            world_store,
        }
    }

    pub async fn handle(&self, cmd: SweepWorldsCommand) -> Result<SweepWorldsResponse, ApplicationError> {
        let expired = self.world_manager.expired_worlds(cmd.idle_timeout_secs);

        let mut swept = Vec::new();
        let mut persisted = 0;
        for world_id in expired {
            // 竞争下可能刚被正常关闭, 跳过即可
            let session = match self.world_manager.close(&world_id) {
                Ok(session) => session,
                Err(_) => continue,
            };

            let snapshot = session.snapshot();
            match self.world_store.save_world(&snapshot).await {
                Ok(()) => persisted += 1,
                Err(err) => {
                    tracing::warn!(
                        world_id = %world_id,
                        error = %err,
                        "World archive write failed"
                    );
                }
            }
            swept.push(world_id);
        }

        if !swept.is_empty() {
            tracing::info!(count = swept.len(), persisted = persisted, "Idle worlds swept");
        }

        Ok(SweepWorldsResponse { swept, persisted })
    }
}
