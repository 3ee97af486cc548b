//! Casting Context - 配音限界上下文
//!
//! 职责:
//! - 音色目录解析与分组
//! - 角色 → 音色的会话稳定分配
//! - 朗读调音与对白预处理

mod catalog;
mod prosody;
mod registry;
mod session;
mod theme;
mod value_objects;

pub mod script;

pub use catalog::{
    parse_voice_description, parse_voice_label, ParsedDescription, RawVoiceRecord, VoiceCatalog,
    VoiceGroup,
};
pub use prosody::{analyze_text_nuance, tuning_for_state, NuanceHint};
pub use registry::{
    smart_fallback_voice, AssignmentSource, CastingRequest, FallbackReason, VoiceAssignment,
    VoiceRegistry,
};
pub use session::CastingSession;
pub use theme::{extract_theme_keywords, theme_preferred_tags};
pub use value_objects::{
    canonical_emotion, AgeBand, CharacterId, Gender, VoiceId, VoiceTuning, WorldId,
    NEUTRAL_EMOTION,
};
