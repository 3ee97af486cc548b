//! 世界观主题词典
//!
//! 从世界描述提取主题键, 再映射为偏好的音色风格标签,
//! 供注册表软评分使用。表序即扫描序, 不要重排。

pub const DEFAULT_THEME: &str = "default";

/// 主题 → 偏好风格标签
const THEME_VOICE_PREFERENCES: [(&str, &[&str]); 17] = [
    // 누아르/범죄 - 진중하고 낮은 톤
    (
        "noir",
        &["낮은", "진중한", "거친", "차가운", "무거운", "어두운", "냉소적", "냉정한"],
    ),
    ("shadow", &["낮은", "진중한", "거친", "차가운", "무거운", "어두운"]),
    ("그림자", &["낮은", "진중한", "거친", "차가운", "무거운", "어두운"]),
    ("부패", &["낮은", "진중한", "거친", "냉소적", "무거운"]),
    ("범죄", &["낮은", "거친", "냉정한", "차가운"]),
    ("항구", &["거친", "낮은", "바다", "피곤한"]),
    // 무협/판타지 - 위엄있고 힘있는
    ("무협", &["위엄있는", "힘있는", "거친", "진중한", "중후한"]),
    ("무림", &["위엄있는", "힘있는", "거친", "진중한", "중후한"]),
    ("판타지", &["장엄한", "위엄있는", "신비로운", "따뜻한"]),
    // 사이버펑크 - 차갑고 기계적
    ("사이버", &["차가운", "기계적", "냉정한", "날카로운"]),
    ("네온", &["차가운", "기계적", "냉정한", "날카로운"]),
    ("디스토피아", &["차가운", "암울한", "무거운", "냉소적"]),
    // 코즈믹 호러 - 신비롭고 불안한
    ("호러", &["속삭이는", "불안한", "신비로운", "낮은", "떨리는"]),
    ("공포", &["속삭이는", "불안한", "신비로운", "낮은"]),
    // 밝은 판타지/로맨스 - 따뜻하고 부드러운
    ("로맨스", &["따뜻한", "부드러운", "상냥한", "밝은"]),
    ("희망", &["따뜻한", "밝은", "에너지있는", "부드러운"]),
    (DEFAULT_THEME, &["자연스러운", "중립", "편안한"]),
];

/// 从世界描述提取主题键
///
/// 先按表序做包含匹配, 再套一组补充规则; 全部落空回落到 default。
/// 同一主题可能出现多次, 去重交由 [`theme_preferred_tags`]。
pub fn extract_theme_keywords(world_description: &str) -> Vec<&'static str> {
    let desc = world_description.to_lowercase();
    let mut keywords: Vec<&'static str> = Vec::new();

    for &(theme, _) in THEME_VOICE_PREFERENCES.iter() {
        if desc.contains(theme) {
            keywords.push(theme);
        }
    }

    if ["비", "그림자", "어두운", "밤"].iter().any(|k| desc.contains(k)) {
        keywords.push("shadow");
    }
    if ["부패", "범죄", "항구"].iter().any(|k| desc.contains(k)) {
        keywords.push("noir");
    }
    if ["잿빛", "낡은", "조사"].iter().any(|k| desc.contains(k)) {
        keywords.push("noir");
    }

    if keywords.is_empty() {
        keywords.push(DEFAULT_THEME);
    }
    keywords
}

/// 世界描述 → 偏好标签, 去重并保持首次出现顺序
pub fn theme_preferred_tags(world_description: Option<&str>) -> Vec<&'static str> {
    let themes = match world_description {
        Some(desc) if !desc.trim().is_empty() => extract_theme_keywords(desc),
        _ => vec![DEFAULT_THEME],
    };

    let mut tags: Vec<&'static str> = Vec::new();
    for theme in themes {
        if let Some(&(_, prefs)) = THEME_VOICE_PREFERENCES.iter().find(|&&(key, _)| key == theme) {
            for &pref in prefs.iter() {
                if !tags.contains(&pref) {
                    tags.push(pref);
                }
            }
        }
    }
    tags
}
