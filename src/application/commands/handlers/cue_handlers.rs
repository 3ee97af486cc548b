//! Cue Command Handlers

use std::sync::Arc;

use crate::application::commands::cue_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{CueClip, CueStorePort};
use crate::domain::audio::{match_cue_category, CUE_CATEGORIES};

/// RequestCue Handler - 类别匹配 + 缓存优先
///
/// 缓存不可用时降级为 NeedsGeneration, 不让音频路径失败。
pub struct RequestCueHandler {
    cue_store: Arc<dyn CueStorePort>,
}

impl RequestCueHandler {
    pub fn new(cue_store: Arc<dyn CueStorePort>) -> Self {
        Self { cue_store }
    }

    pub async fn handle(&self, cmd: RequestCueCommand) -> Result<RequestCueResponse, ApplicationError> {
        let matched = match match_cue_category(&cmd.context, cmd.kind) {
            Some(matched) => matched,
            None => {
                tracing::debug!(context = %cmd.context, "No cue category matched");
                return Ok(RequestCueResponse {
                    outcome: CueOutcome::NoMatch,
                });
            }
        };

        tracing::info!(
            category = %matched.category.id,
            score = matched.score,
            "Cue category matched"
        );

        let outcome = match self.cue_store.get(matched.category.id).await {
            Ok(Some(clip)) => {
                // 命中登记失败不影响结果
                if let Err(err) = self.cue_store.touch(matched.category.id).await {
                    tracing::debug!(
                        category = %matched.category.id,
                        error = %err,
                        "Cue touch failed"
                    );
                }
                tracing::info!(category = %matched.category.id, "Cue cache hit");
                CueOutcome::CachedHit {
                    category_id: clip.category_id,
                    kind: clip.kind,
                    url: clip.url,
                }
            }
            Ok(None) => {
                tracing::info!(category = %matched.category.id, "Cue cache miss");
                CueOutcome::NeedsGeneration {
                    category_id: matched.category.id.to_string(),
                    kind: matched.category.kind,
                }
            }
            Err(err) => {
                tracing::warn!(
                    category = %matched.category.id,
                    error = %err,
                    "Cue store unavailable, requesting generation"
                );
                CueOutcome::NeedsGeneration {
                    category_id: matched.category.id.to_string(),
                    kind: matched.category.kind,
                }
            }
        };

        Ok(RequestCueResponse { outcome })
    }
}

/// StoreCue Handler - 回填生成的音频
pub struct StoreCueHandler {
    cue_store: Arc<dyn CueStorePort>,
}

impl StoreCueHandler {
    pub fn new(cue_store: Arc<dyn CueStorePort>) -> Self {
        Self { cue_store }
    }

    pub async fn handle(&self, cmd: StoreCueCommand) -> Result<StoreCueResponse, ApplicationError> {
        let category = CUE_CATEGORIES
            .iter()
            .find(|category| category.id == cmd.category_id)
            .ok_or_else(|| {
                ApplicationError::validation(format!("Unknown cue category: {}", cmd.category_id))
            })?;
        if cmd.url.trim().is_empty() {
            return Err(ApplicationError::validation("Cue url must not be empty"));
        }

        let clip = CueClip::new(category.id.to_string(), category.kind, cmd.url);
        self.cue_store.put(clip).await?;

        tracing::info!(
            category = %cmd.category_id,
            kind = category.kind.label(),
            "Cue cached"
        );

        Ok(StoreCueResponse {
            category_id: cmd.category_id,
        })
    }
}
