//! 朗读调音 - 情绪/状态 → 语速与音调
//!
//! 固定的状态参数表加上对白文本的微调分析。表序即部分匹配的
//! 扫描序, 新增条目只能追加。

use super::value_objects::VoiceTuning;

/// 状态 → 基础调音参数
///
/// 键保持小写; 韩英同义键各占一条, 部分匹配依赖这一点。
const STATE_TUNING_TABLE: [(&str, f64, f64); 51] = [
    // 기본 감정
    ("중립", 1.0, 1.0),
    ("neutral", 1.0, 1.0),
    ("행복", 1.05, 1.05),
    ("happiness", 1.05, 1.05),
    ("기쁨", 1.08, 1.08),
    ("슬픔", 0.90, 0.95),
    ("sadness", 0.90, 0.95),
    ("분노", 0.95, 0.95),
    ("anger", 0.95, 0.95),
    // 심리 상태
    ("비꼼", 0.90, 1.05),
    ("빈정", 0.90, 1.05),
    ("sarcasm", 0.90, 1.05),
    ("냉철", 0.92, 0.92),
    ("협박", 0.92, 0.90),
    ("위협", 0.90, 0.90),
    ("cold_threat", 0.90, 0.90),
    ("당황", 1.20, 1.10),
    ("횡설수설", 1.25, 1.15),
    ("flustered", 1.20, 1.10),
    ("광기", 1.20, 1.35),
    ("조소", 1.15, 1.30),
    ("madness", 1.20, 1.35),
    ("수줍음", 0.95, 1.04),
    ("shy", 0.95, 1.04),
    ("억누르는분노", 0.92, 0.88),
    ("suppressed", 0.92, 0.88),
    ("체념", 0.85, 0.95),
    ("허탈", 0.82, 0.94),
    ("resignation", 0.85, 0.95),
    ("아부", 1.05, 1.10),
    ("비굴", 1.05, 1.08),
    ("flattery", 1.05, 1.10),
    // 신체/환경 상태
    ("빈사", 0.75, 0.90),
    ("dying", 0.75, 0.90),
    ("지침", 0.78, 0.92),
    ("exhausted", 0.78, 0.92),
    ("기합", 1.30, 1.25),
    ("전투", 1.30, 1.20),
    ("combat", 1.30, 1.20),
    ("속삭임", 0.90, 0.95),
    ("whisper", 0.90, 0.95),
    ("취함", 0.80, 0.98),
    ("drunk", 0.80, 0.98),
    // 복합 감정
    ("냉소", 0.90, 1.02),
    ("경멸", 0.88, 1.04),
    ("긴장", 1.10, 1.05),
    ("공포", 1.15, 1.20),
    ("비통", 0.80, 0.90),
    ("절망", 0.75, 0.85),
    ("흥분", 1.15, 1.15),
    ("시무룩", 0.92, 0.96),
];

/// 调音微调的上限, 防止叠加过度
const MOD_LIMIT: f64 = 0.3;

/// 文本微调分析结果
#[derive(Debug, Clone, PartialEq)]
pub struct NuanceHint {
    /// 从文本推断的情绪, 仅用于日志
    pub emotion: &'static str,
    pub speed_mod: f64,
    pub pitch_mod: f64,
}

#[inline]
fn is_hangul(c: char) -> bool {
    ('가'..='힣').contains(&c)
}

/// 分析对白文本的语气线索
///
/// 规则按序应用: 叹号连发 → 省略号 → 畏缩词 → 攻击词 →
/// 반어 물결 → 한숨 패턴。修正量累加后裁剪到 ±0.3,
/// 情绪标签以最后命中的规则为准。
pub fn analyze_text_nuance(text: &str) -> NuanceHint {
    let mut speed_mod: f64 = 0.0;
    let mut pitch_mod: f64 = 0.0;
    let mut emotion = "중립";

    let exclamations = text.matches('!').count();
    let ellipses = text.matches("...").count();

    if exclamations >= 2 {
        speed_mod += 0.15;
        pitch_mod += 0.20;
        emotion = "흥분";
    }
    if ellipses >= 2 {
        speed_mod -= 0.15;
        pitch_mod -= 0.10;
        emotion = "망설임";
    }

    const FEAR_WORDS: [&str; 6] = ["제발", "혹시", "죄송", "미안", "두려", "무서"];
    if FEAR_WORDS.iter().any(|w| text.contains(w)) {
        speed_mod -= 0.05;
        pitch_mod += 0.05;
        emotion = "수줍음";
    }

    const AGGRESSIVE_WORDS: [&str; 5] = ["닥쳐", "당장", "죽여", "꺼져", "망할"];
    if AGGRESSIVE_WORDS.iter().any(|w| text.contains(w)) {
        speed_mod += 0.10;
        pitch_mod -= 0.05;
        emotion = "분노";
    }

    // 반어법: 한글~한글 ("정~말", "대~단")
    let chars: Vec<char> = text.chars().collect();
    if chars
        .windows(3)
        .any(|w| w[1] == '~' && is_hangul(w[0]) && is_hangul(w[2]))
    {
        speed_mod -= 0.15;
        pitch_mod += 0.10;
        emotion = "비꼼";
    }

    if text.contains("(하...)") || text.contains("(후우...)") || text.contains("하아...") {
        speed_mod -= 0.10;
        pitch_mod -= 0.05;
        emotion = "체념";
    }

    NuanceHint {
        emotion,
        speed_mod: speed_mod.clamp(-MOD_LIMIT, MOD_LIMIT),
        pitch_mod: pitch_mod.clamp(-MOD_LIMIT, MOD_LIMIT),
    }
}

/// 状态关键词 → 调音参数
///
/// 先精确命中, 否则按表序取第一个双向包含的键, 都落空时 1.0/1.0。
/// 传入对白文本时叠加微调, 最终裁剪到 [0.5, 2.0] 并保留两位小数。
pub fn tuning_for_state(emotion_or_state: &str, dialogue_text: Option<&str>) -> VoiceTuning {
    let normalized = emotion_or_state.trim().to_lowercase();

    let mut tuning = STATE_TUNING_TABLE
        .iter()
        .find(|&&(key, _, _)| key == normalized)
        .or_else(|| {
            STATE_TUNING_TABLE
                .iter()
                .find(|&&(key, _, _)| normalized.contains(key) || key.contains(normalized.as_str()))
        })
        .map(|&(_, speed, pitch)| VoiceTuning::new(speed, pitch))
        .unwrap_or_default();

    if let Some(text) = dialogue_text {
        let nuance = analyze_text_nuance(text);
        tuning.speed += nuance.speed_mod;
        tuning.pitch += nuance.pitch_mod;
    }

    tuning.clamped()
}
