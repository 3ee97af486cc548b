//! Cue Commands - 音频提示相关命令

use crate::domain::audio::CueKind;

/// 请求音频提示命令
#[derive(Debug, Clone)]
pub struct RequestCueCommand {
    /// 叙事上下文描述
    pub context: String,
    /// 限定种类, None 时音效与配乐都参与匹配
    pub kind: Option<CueKind>,
}

/// 音频提示结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueOutcome {
    /// 类别命中且缓存有货
    CachedHit {
        category_id: String,
        kind: CueKind,
        url: String,
    },
    /// 类别命中但缓存无货, 调用方生成后用 StoreCue 回填
    NeedsGeneration {
        category_id: String,
        kind: CueKind,
    },
    /// 上下文未命中任何类别
    NoMatch,
}

/// 请求音频提示响应
#[derive(Debug, Clone)]
pub struct RequestCueResponse {
    pub outcome: CueOutcome,
}

/// 回填生成音频命令
#[derive(Debug, Clone)]
pub struct StoreCueCommand {
    pub category_id: String,
    pub url: String,
}

/// 回填生成音频响应
#[derive(Debug, Clone)]
pub struct StoreCueResponse {
    pub category_id: String,
}
