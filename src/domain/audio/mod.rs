//! Audio Context - 音频限界上下文
//!
//! 叙事上下文 → 音效/配乐类别的关键词匹配。

mod cues;

pub use cues::{match_cue_category, CueCategory, CueKind, CueMatch, CUE_CATEGORIES};
