//! Casting Command Handlers

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;

use crate::application::catalog_loader::CatalogLoader;
use crate::application::commands::casting_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{WorldManagerPort, WorldStorePort};
use crate::domain::voice::script;
use crate::domain::voice::{
    tuning_for_state, AssignmentSource, CastingRequest, CharacterId, VoiceAssignment,
    VoiceRegistry, WorldId,
};

/// 拿会话、评分、写回、存档、记日志的公共流程
///
/// 只有新落表的分配才触发存档写入; 写入失败降级为警告。
async fn assign_for(
    world_manager: &Arc<dyn WorldManagerPort>,
    world_store: &Arc<dyn WorldStorePort>,
    catalog_loader: &Arc<CatalogLoader>,
    rng: &Mutex<StdRng>,
    world_id: &WorldId,
    request: &CastingRequest,
    external_cast: Option<&BTreeMap<CharacterId, String>>,
    display_name: Option<&str>,
) -> Result<VoiceAssignment, ApplicationError> {
    let mut session = world_manager
        .get(world_id)
        .map_err(|_| ApplicationError::not_found("World", world_id.as_str()))?;

    let catalog = catalog_loader.load().await;
    let registry = VoiceRegistry::new(catalog);

    let assignment = {
        let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
        registry.assign(&mut session.casting, request, external_cast, &mut rng)
    };

    let newly_committed = matches!(assignment.source, AssignmentSource::Scored { .. });
    let snapshot = newly_committed.then(|| session.snapshot());

    world_manager
        .put_casting(world_id, session.casting)
        .map_err(|_| ApplicationError::not_found("World", world_id.as_str()))?;

    let log_name = display_name.unwrap_or_else(|| request.character.as_str());
    match assignment.source {
        AssignmentSource::Scored { score, pool_reused } => {
            if pool_reused {
                tracing::info!(
                    world_id = %world_id,
                    character = %request.character,
                    "Voice pool exhausted, allowing reuse"
                );
            }
            tracing::info!(
                world_id = %world_id,
                character = %request.character,
                display_name = %log_name,
                identity = %assignment.base_identity,
                score = score,
                "New voice assigned"
            );
        }
        AssignmentSource::ExternalCache | AssignmentSource::SessionCache => {
            tracing::debug!(
                world_id = %world_id,
                character = %request.character,
                identity = %assignment.base_identity,
                source = ?assignment.source,
                "Reusing cached voice"
            );
        }
        AssignmentSource::SmartFallback(reason) => {
            tracing::warn!(
                world_id = %world_id,
                character = %request.character,
                display_name = %log_name,
                reason = ?reason,
                identity = %assignment.base_identity,
                "Smart fallback voice used"
            );
        }
    }

    if let Some(snapshot) = snapshot {
        if let Err(err) = world_store.save_world(&snapshot).await {
            tracing::warn!(
                world_id = %world_id,
                error = %err,
                "Cast snapshot write failed"
            );
        }
    }

    Ok(assignment)
}

/// CastVoice Handler - 只分配音色
pub struct CastVoiceHandler {
    world_manager: Arc<dyn WorldManagerPort>,
    world_store: Arc<dyn WorldStorePort>,
    catalog_loader: Arc<CatalogLoader>,
    rng: Mutex<StdRng>,
}

impl CastVoiceHandler {
    pub fn new(
        world_manager: Arc<dyn WorldManagerPort>,
        world_store: Arc<dyn WorldStorePort>,
        catalog_loader: Arc<CatalogLoader>,
        rng: StdRng,
    ) -> Self {
        Self {
            world_manager,
            world_store,
            catalog_loader,
            rng: Mutex::new(rng),
        }
    }

    pub async fn handle(&self, cmd: CastVoiceCommand) -> Result<CastVoiceResponse, ApplicationError> {
        let request = CastingRequest {
            character: cmd.character,
            gender: cmd.gender,
            age_band: cmd.age_band,
            style_tags: cmd.style_tags,
            emotion: cmd.emotion.unwrap_or_default(),
            theme_context: cmd.theme_context,
        };

        let assignment = assign_for(
            &self.world_manager,
            &self.world_store,
            &self.catalog_loader,
            &self.rng,
            &cmd.world_id,
            &request,
            cmd.external_cast.as_ref(),
            cmd.display_name.as_deref(),
        )
        .await?;

        Ok(CastVoiceResponse {
            voice_id: assignment.voice_id,
            base_identity: assignment.base_identity,
            source: assignment.source,
        })
    }
}

/// SpeakLine Handler - 分配音色 + 对白预处理 + 调音解析
pub struct SpeakLineHandler {
    world_manager: Arc<dyn WorldManagerPort>,
    world_store: Arc<dyn WorldStorePort>,
    catalog_loader: Arc<CatalogLoader>,
    rng: Mutex<StdRng>,
}

impl SpeakLineHandler {
    pub fn new(
        world_manager: Arc<dyn WorldManagerPort>,
        world_store: Arc<dyn WorldStorePort>,
        catalog_loader: Arc<CatalogLoader>,
        rng: StdRng,
    ) -> Self {
        Self {
            world_manager,
            world_store,
            catalog_loader,
            rng: Mutex::new(rng),
        }
    }

    pub async fn handle(&self, cmd: SpeakLineCommand) -> Result<SpeakLineResponse, ApplicationError> {
        // 对白预处理; 清空不是错误, 表示这句无话可说
        let text = script::prepare_dialogue(&cmd.dialogue_text);

        // 调音状态: 身体状态 > 心理状态 > 情绪
        let effective_state = script::effective_state(
            cmd.physical_state.as_deref(),
            cmd.psychological_state.as_deref(),
            cmd.emotion.as_deref(),
        )
        .to_string();

        let request = CastingRequest {
            character: cmd.character,
            gender: cmd.gender,
            age_band: cmd.age_band,
            style_tags: cmd.style_tags,
            emotion: cmd.emotion.unwrap_or_default(),
            theme_context: cmd.theme_context,
        };

        let assignment = assign_for(
            &self.world_manager,
            &self.world_store,
            &self.catalog_loader,
            &self.rng,
            &cmd.world_id,
            &request,
            cmd.external_cast.as_ref(),
            cmd.display_name.as_deref(),
        )
        .await?;

        let tuning = tuning_for_state(&effective_state, text.as_deref());

        if text.is_none() {
            tracing::debug!(
                world_id = %cmd.world_id,
                character = %request.character,
                "Nothing to speak after dialogue preparation"
            );
        } else {
            tracing::debug!(
                world_id = %cmd.world_id,
                character = %request.character,
                state = %effective_state,
                speed = tuning.speed,
                pitch = tuning.pitch,
                "Speech line prepared"
            );
        }

        Ok(SpeakLineResponse {
            voice_id: assignment.voice_id,
            base_identity: assignment.base_identity,
            source: assignment.source,
            text,
            tuning,
            effective_state,
        })
    }
}
