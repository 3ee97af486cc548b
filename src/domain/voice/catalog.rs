//! Casting Context - 音色目录
//!
//! 把供应商目录的原始记录解析并按基础身份分组。同名身份的
//! 情绪变体收拢到一个 VoiceGroup, 供注册表按情绪解析音色。

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::value_objects::{canonical_emotion, AgeBand, Gender, VoiceId, NEUTRAL_EMOTION};

/// 供应商目录的原始记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVoiceRecord {
    /// 供应商分配的音色 ID
    pub id: String,
    /// 显示名, 可带情绪后缀: "가레스(분노)"
    pub label: String,
    /// 逗号分隔的描述串: "남성, 중년, 저음, 맑음, 따뜻한"
    pub description: String,
}

/// 解析后的描述维度
#[derive(Debug, Clone)]
pub struct ParsedDescription {
    pub gender: Gender,
    pub age_band: AgeBand,
    pub style_tags: BTreeSet<String>,
}

/// 从显示名中拆出基础身份与情绪后缀
///
/// "가레스(분노)" → ("가레스", "분노"), 无后缀时情绪为中性。
/// 情绪取第一个 '(' 到结尾 ')' 之间的全部内容, 嵌套括号原样保留。
pub fn parse_voice_label(label: &str) -> (String, String) {
    let trimmed = label.trim();
    if trimmed.ends_with(')') {
        if let Some(open) = trimmed.find('(') {
            let base = &trimmed[..open];
            let emotion = &trimmed[open + 1..trimmed.len() - 1];
            if !base.is_empty() && !emotion.is_empty() {
                return (base.to_string(), canonical_emotion(emotion));
            }
        }
    }
    (trimmed.to_string(), NEUTRAL_EMOTION.to_string())
}

/// 解析逗号分隔的描述串
///
/// 位置约定: 第 0 项性别, 第 1 项年龄段, 第 2 项音高, 其余为
/// 风格属性。音高标签与第 3 项的质感词总是保留进风格集合,
/// 其余位置上的轴词 (性别/年龄/音高/质感) 排除。
pub fn parse_voice_description(description: &str) -> ParsedDescription {
    const AXIS_WORDS: [&str; 14] = [
        "남성", "여성", "어린이", "청소년", "청년", "중년", "노년", "고음", "중음", "저음",
        "굵음", "얇음", "거침", "맑음",
    ];

    let parts: Vec<&str> = description.split(',').map(str::trim).collect();

    let gender = parts
        .first()
        .map(|p| Gender::from_label(p))
        .unwrap_or(Gender::Male);
    let age_band = parts
        .get(1)
        .map(|p| AgeBand::from_label(p))
        .unwrap_or(AgeBand::YoungAdult);
    let pitch = parts
        .get(2)
        .map(|p| {
            if p.contains("고음") {
                "고음"
            } else if p.contains("저음") {
                "저음"
            } else {
                "중음"
            }
        })
        .unwrap_or("중음");

    let mut style_tags: BTreeSet<String> = parts
        .iter()
        .skip(3)
        .filter(|p| !p.is_empty() && !AXIS_WORDS.iter().any(|axis| axis == *p))
        .map(|p| p.to_lowercase())
        .collect();

    // 第 3 项按约定是质感词, 即使是轴词也保留
    if let Some(texture) = parts.get(3) {
        if !texture.is_empty() {
            style_tags.insert(texture.to_lowercase());
        }
    }
    style_tags.insert(pitch.to_string());

    ParsedDescription {
        gender,
        age_band,
        style_tags,
    }
}

/// 音色组 - 同一基础身份的全部情绪变体
///
/// 不变量:
/// - emotion_map 非空且总是含 "neutral" 条目
/// - style_tags 全部小写
/// - 性别与年龄段取自该身份的首条记录
#[derive(Debug, Clone)]
pub struct VoiceGroup {
    base_identity: String,
    gender: Gender,
    age_band: AgeBand,
    style_tags: BTreeSet<String>,
    emotion_map: BTreeMap<String, VoiceId>,
    base_voice: VoiceId,
}

impl VoiceGroup {
    // Getters
    pub fn base_identity(&self) -> &str {
        &self.base_identity
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn age_band(&self) -> AgeBand {
        self.age_band
    }

    pub fn style_tags(&self) -> &BTreeSet<String> {
        &self.style_tags
    }

    pub fn emotion_map(&self) -> &BTreeMap<String, VoiceId> {
        &self.emotion_map
    }

    /// 按情绪解析音色: 精确命中, 否则中性, 否则首条记录
    pub fn resolve_emotion(&self, emotion: &str) -> VoiceId {
        let canonical = canonical_emotion(emotion);
        self.emotion_map
            .get(&canonical)
            .or_else(|| self.emotion_map.get(NEUTRAL_EMOTION))
            .cloned()
            .unwrap_or_else(|| self.base_voice.clone())
    }
}

/// 音色目录 - 保持来源记录的首见顺序
#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    groups: Vec<VoiceGroup>,
    index: HashMap<String, usize>,
}

impl VoiceCatalog {
    /// 从原始记录构建分组目录
    ///
    /// 畸形记录 (空 ID 或空显示名) 跳过; 同一身份重复的情绪以后
    /// 出现者为准; 缺少中性变体的身份以首条记录的音色补齐。
    pub fn from_records(records: Vec<RawVoiceRecord>) -> Self {
        let mut catalog = Self::default();

        for raw in records {
            if raw.id.trim().is_empty() {
                continue;
            }
            let (base_identity, emotion) = parse_voice_label(&raw.label);
            if base_identity.is_empty() {
                continue;
            }
            let voice_id = VoiceId::new(raw.id);
            let parsed = parse_voice_description(&raw.description);

            match catalog.index.get(&base_identity) {
                Some(&slot) => {
                    let group = &mut catalog.groups[slot];
                    group.style_tags.extend(parsed.style_tags);
                    group.emotion_map.insert(emotion, voice_id);
                }
                None => {
                    let mut emotion_map = BTreeMap::new();
                    emotion_map.insert(emotion, voice_id.clone());
                    catalog.index.insert(base_identity.clone(), catalog.groups.len());
                    catalog.groups.push(VoiceGroup {
                        base_identity,
                        gender: parsed.gender,
                        age_band: parsed.age_band,
                        style_tags: parsed.style_tags,
                        emotion_map,
                        base_voice: voice_id,
                    });
                }
            }
        }

        for group in &mut catalog.groups {
            if !group.emotion_map.contains_key(NEUTRAL_EMOTION) {
                group
                    .emotion_map
                    .insert(NEUTRAL_EMOTION.to_string(), group.base_voice.clone());
            }
        }

        catalog
    }

    /// 内置目录 - 来源不可用时的兜底
    ///
    /// 九个基础身份覆盖两性与四个年龄段, 中性音色的 ID 与
    /// 兜底音色表一致。
    pub fn embedded() -> Self {
        Self::from_records(embedded_records())
    }

    pub fn groups(&self) -> &[VoiceGroup] {
        &self.groups
    }

    pub fn get(&self, base_identity: &str) -> Option<&VoiceGroup> {
        self.index.get(base_identity).map(|&slot| &self.groups[slot])
    }

    pub fn contains(&self, base_identity: &str) -> bool {
        self.index.contains_key(base_identity)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn embedded_records() -> Vec<RawVoiceRecord> {
    const SEED: [(&str, &str, &str); 21] = [
        (
            "9e7d201d-a18a-5343-8e05-057a78e6d432",
            "깐깐이(중립)",
            "남성, 청소년, 고음, 얇음, 밝은, 에너지있는",
        ),
        (
            "b4c1f0aa-2c95-5e07-9d64-4a81b52f7c19",
            "깐깐이(화남)",
            "남성, 청소년, 고음, 얇음, 밝은, 에너지있는",
        ),
        (
            "7c34ecc2-3665-57f6-9a31-902d4549c1ad",
            "가리온(중립)",
            "남성, 청년, 중음, 맑음, 위엄있는, 따뜻한",
        ),
        (
            "5f02ad83-91c4-5b2e-8a77-63d90e14f5b8",
            "가리온(기쁨)",
            "남성, 청년, 중음, 맑음, 위엄있는, 따뜻한",
        ),
        (
            "297d6972-b87d-57dc-86e0-70534b924ef5",
            "가레스(중립)",
            "남성, 중년, 저음, 맑음, 따뜻한, 자연스러운",
        ),
        (
            "a9183c44-06d5-5f21-b7e8-2c4fa0d9617e",
            "가레스(분노)",
            "남성, 중년, 저음, 맑음, 따뜻한, 자연스러운",
        ),
        (
            "c57e0b36-4a88-5d13-9f02-81b6de25a3f4",
            "가레스(슬픔)",
            "남성, 중년, 저음, 맑음, 따뜻한, 자연스러운",
        ),
        (
            "74dcea6a-29b3-5d92-82d0-3c03225d79e4",
            "가렛(중립)",
            "남성, 중년, 저음, 굵음, 강인한, 힘있는",
        ),
        (
            "e21b9d07-5cf3-5a68-b194-70e8c3d2a6b5",
            "가렛(기합)",
            "남성, 중년, 저음, 굵음, 강인한, 힘있는",
        ),
        (
            "1249e39f-317f-5a2e-96f6-82489348b4fd",
            "갈도르(중립)",
            "남성, 노년, 중음, 거침, 진중한, 낮은",
        ),
        (
            "f83a5c12-6e09-5b74-a3d8-95f1e0b7c24a",
            "갈도르(분노)",
            "남성, 노년, 중음, 거침, 진중한, 낮은",
        ),
        (
            "3aa817b3-b871-5b97-bf78-759c40b830c4",
            "노엘라(중립)",
            "여성, 청소년, 고음, 맑음, 밝은, 상냥한",
        ),
        (
            "d6f42a89-10b7-5c35-8e61-b29c47d0f8a3",
            "노엘라(기쁨)",
            "여성, 청소년, 고음, 맑음, 밝은, 상냥한",
        ),
        (
            "adfc2330-3a22-501b-897d-313d7472f2d8",
            "나디스(중립)",
            "여성, 청년, 고음, 맑음, 차분한, 부드러운",
        ),
        (
            "8b50e7d4-92af-5618-bc30-6d14a8f3e972",
            "나디스(슬픔)",
            "여성, 청년, 고음, 맑음, 차분한, 부드러운",
        ),
        (
            "67c9f1b0-d345-5a82-9078-1e5b2cd4a6f9",
            "나디스(행복)",
            "여성, 청년, 고음, 맑음, 차분한, 부드러운",
        ),
        (
            "78f25ef6-caf5-53b9-9e0b-fa5ebf3fceae",
            "나엘린(중립)",
            "여성, 중년, 저음, 굵음, 경건한, 차가운",
        ),
        (
            "42d80a6e-71fb-5c94-a5d2-c8e30f96b1d7",
            "나엘린(속삭임)",
            "여성, 중년, 저음, 굵음, 경건한, 차가운",
        ),
        (
            "0b89f11b-1bbe-516c-9734-9b258ea0e83f",
            "니마라(중립)",
            "여성, 노년, 중음, 거침, 신비로운, 낮은",
        ),
        (
            "91e36b58-2dc0-5f47-8ab9-04c7d18e5f26",
            "니마라(공포)",
            "여성, 노년, 중음, 거침, 신비로운, 낮은",
        ),
        (
            "ae74c2f1-853d-5906-bd15-7f28a09c4e63",
            "니마라(슬픔)",
            "여성, 노년, 중음, 거침, 신비로운, 낮은",
        ),
    ];

    SEED.iter()
        .map(|(id, label, description)| RawVoiceRecord {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        })
        .collect()
}
