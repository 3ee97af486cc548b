//! Casting Commands - 配音相关命令

use std::collections::BTreeMap;

use crate::domain::voice::{
    AgeBand, AssignmentSource, CharacterId, Gender, VoiceId, VoiceTuning, WorldId,
};

/// 配音命令 - 只分配音色, 不处理对白
#[derive(Debug, Clone)]
pub struct CastVoiceCommand {
    pub world_id: WorldId,
    pub character: CharacterId,
    /// 显示名仅用于日志
    pub display_name: Option<String>,
    pub gender: Option<Gender>,
    pub age_band: Option<AgeBand>,
    pub style_tags: Vec<String>,
    pub emotion: Option<String>,
    /// 本次请求的主题上下文, 缺省时用世界主题
    pub theme_context: Option<String>,
    /// 调用方持有的既有配音表, 命中时优先复用
    pub external_cast: Option<BTreeMap<CharacterId, String>>,
}

/// 配音响应
#[derive(Debug, Clone)]
pub struct CastVoiceResponse {
    pub voice_id: VoiceId,
    pub base_identity: String,
    pub source: AssignmentSource,
}

/// 台词命令 - 分配音色 + 对白预处理 + 调音解析
#[derive(Debug, Clone)]
pub struct SpeakLineCommand {
    pub world_id: WorldId,
    pub character: CharacterId,
    pub display_name: Option<String>,
    pub gender: Option<Gender>,
    pub age_band: Option<AgeBand>,
    pub style_tags: Vec<String>,
    pub dialogue_text: String,
    pub emotion: Option<String>,
    pub physical_state: Option<String>,
    pub psychological_state: Option<String>,
    pub theme_context: Option<String>,
    pub external_cast: Option<BTreeMap<CharacterId, String>>,
}

/// 台词响应
#[derive(Debug, Clone)]
pub struct SpeakLineResponse {
    pub voice_id: VoiceId,
    pub base_identity: String,
    pub source: AssignmentSource,
    /// 去掉标记与长舞台指示后的朗读文本; None 表示清理后无话可说, 跳过合成
    pub text: Option<String>,
    pub tuning: VoiceTuning,
    /// 实际用于调音的状态标签
    pub effective_state: String,
}
