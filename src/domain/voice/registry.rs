//! 角色配音注册表 - 核心匹配算法
//!
//! 会话内同一角色永远得到同一基础身份; 不同角色尽量不共享,
//! 目录耗尽时允许复用。硬过滤 (性别/年龄) 零候选时退到兜底
//! 音色表, 兜底结果不记入会话占用。

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;

use super::catalog::{VoiceCatalog, VoiceGroup};
use super::session::CastingSession;
use super::theme;
use super::value_objects::{AgeBand, CharacterId, Gender, VoiceId};

/// 一次配音请求
#[derive(Debug, Clone)]
pub struct CastingRequest {
    /// 稳定角色 ID, 配音表以它为键
    pub character: CharacterId,
    pub gender: Option<Gender>,
    pub age_band: Option<AgeBand>,
    pub style_tags: Vec<String>,
    pub emotion: String,
    /// 本次请求的主题上下文, 缺省时用会话的世界主题
    pub theme_context: Option<String>,
}

/// 兜底原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// 目录为空
    EmptyCatalog,
    /// 请求的性别在候选池里不存在
    GenderExhausted,
    /// 请求的年龄段在候选池里不存在
    AgeExhausted,
    /// 过滤后候选池为空
    EmptyPool,
}

/// 分配来源
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssignmentSource {
    ExternalCache,
    SessionCache,
    /// 评分选出的新分配; pool_reused 表示目录已耗尽允许复用
    Scored { score: f64, pool_reused: bool },
    SmartFallback(FallbackReason),
}

/// 分配结果
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceAssignment {
    pub voice_id: VoiceId,
    pub base_identity: String,
    pub source: AssignmentSource,
}

/// 兜底音色表 - 两性 × 四个年龄桶, 儿童并入青少年
///
/// 中性音色 ID 与内置目录一致, 目录完全不可用时依然可以发声。
const SMART_FALLBACK_VOICES: [(Gender, AgeBand, &str, &str); 8] = [
    (
        Gender::Male,
        AgeBand::Teen,
        "9e7d201d-a18a-5343-8e05-057a78e6d432",
        "깐깐이",
    ),
    (
        Gender::Male,
        AgeBand::YoungAdult,
        "7c34ecc2-3665-57f6-9a31-902d4549c1ad",
        "가리온",
    ),
    (
        Gender::Male,
        AgeBand::MiddleAged,
        "297d6972-b87d-57dc-86e0-70534b924ef5",
        "가레스",
    ),
    (
        Gender::Male,
        AgeBand::Elder,
        "1249e39f-317f-5a2e-96f6-82489348b4fd",
        "갈도르",
    ),
    (
        Gender::Female,
        AgeBand::Teen,
        "3aa817b3-b871-5b97-bf78-759c40b830c4",
        "노엘라",
    ),
    (
        Gender::Female,
        AgeBand::YoungAdult,
        "adfc2330-3a22-501b-897d-313d7472f2d8",
        "나디스",
    ),
    (
        Gender::Female,
        AgeBand::MiddleAged,
        "78f25ef6-caf5-53b9-9e0b-fa5ebf3fceae",
        "나엘린",
    ),
    (
        Gender::Female,
        AgeBand::Elder,
        "0b89f11b-1bbe-516c-9734-9b258ea0e83f",
        "니마라",
    ),
];

/// 按性别与年龄桶查兜底音色
///
/// 属性缺失时取男性/中年; 表中无命中时回落到 가레스 (男性中年)。
pub fn smart_fallback_voice(gender: Option<Gender>, age_band: Option<AgeBand>) -> (VoiceId, &'static str) {
    let gender = gender.unwrap_or(Gender::Male);
    let bucket = age_band
        .map(|band| band.fallback_bucket())
        .unwrap_or(AgeBand::MiddleAged);

    let &(_, _, id, name) = SMART_FALLBACK_VOICES
        .iter()
        .find(|&&(g, band, _, _)| g == gender && band == bucket)
        .unwrap_or(&SMART_FALLBACK_VOICES[2]);
    (VoiceId::new(id), name)
}

/// 角色配音注册表
///
/// 持有不可变目录; 会话状态由调用方显式传入, 本类型无内部可变性。
pub struct VoiceRegistry {
    catalog: Arc<VoiceCatalog>,
}

impl VoiceRegistry {
    pub fn new(catalog: Arc<VoiceCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// 为角色分配音色
    ///
    /// 依次尝试: 外部缓存命中 → 会话缓存命中 → 候选池评分。
    /// 过程整体不可失败, 一切退化路径都落到兜底音色。
    pub fn assign(
        &self,
        session: &mut CastingSession,
        request: &CastingRequest,
        external_cache: Option<&BTreeMap<CharacterId, String>>,
        rng: &mut StdRng,
    ) -> VoiceAssignment {
        if self.catalog.is_empty() {
            return self.fallback_assignment(request, FallbackReason::EmptyCatalog);
        }

        // 外部缓存命中: 身份必须仍在目录中, 否则继续往下走
        if let Some(cache) = external_cache {
            if let Some(identity) = cache.get(&request.character) {
                if let Some(group) = self.catalog.get(identity) {
                    return VoiceAssignment {
                        voice_id: group.resolve_emotion(&request.emotion),
                        base_identity: identity.clone(),
                        source: AssignmentSource::ExternalCache,
                    };
                }
            }
        }

        // 会话缓存命中
        if let Some(identity) = session.assigned_identity(&request.character) {
            if let Some(group) = self.catalog.get(identity) {
                return VoiceAssignment {
                    voice_id: group.resolve_emotion(&request.emotion),
                    base_identity: identity.to_string(),
                    source: AssignmentSource::SessionCache,
                };
            }
        }

        // 候选池: 未占用优先, 耗尽后允许整表复用
        let mut excluded: BTreeSet<String> = session.used_identities().clone();
        if let Some(cache) = external_cache {
            excluded.extend(cache.values().cloned());
        }

        let unused: Vec<&VoiceGroup> = self
            .catalog
            .groups()
            .iter()
            .filter(|group| !excluded.contains(group.base_identity()))
            .collect();
        let pool_reused = unused.is_empty();
        let pool = if pool_reused {
            self.catalog.groups().iter().collect()
        } else {
            unused
        };

        // 性别硬过滤
        let mut filtered = pool;
        if let Some(gender) = request.gender {
            let matched: Vec<&VoiceGroup> = filtered
                .iter()
                .copied()
                .filter(|group| group.gender() == gender)
                .collect();
            if matched.is_empty() {
                return self.fallback_assignment(request, FallbackReason::GenderExhausted);
            }
            filtered = matched;
        }

        // 年龄硬过滤
        if let Some(age_band) = request.age_band {
            let matched: Vec<&VoiceGroup> = filtered
                .iter()
                .copied()
                .filter(|group| group.age_band() == age_band)
                .collect();
            if matched.is_empty() {
                return self.fallback_assignment(request, FallbackReason::AgeExhausted);
            }
            filtered = matched;
        }

        // 软评分: 主题偏好 ×3 + 角色风格 ×2 + 随机抖动 [0, 0.5)
        let theme_desc = request
            .theme_context
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| session.world_theme());
        let theme_tags = theme::theme_preferred_tags(theme_desc);

        let mut best: Option<&VoiceGroup> = None;
        let mut best_score = -1.0_f64;
        for group in filtered.iter().copied() {
            let tags = group.style_tags();
            let mut score = 0.0;
            for &pref in &theme_tags {
                if tags.contains(pref) {
                    score += 3.0;
                }
            }
            for style in &request.style_tags {
                if tags.contains(style.to_lowercase().as_str()) {
                    score += 2.0;
                }
            }
            score += rng.gen_range(0.0..0.5);

            if score > best_score {
                best_score = score;
                best = Some(group);
            }
        }

        let winner = match best {
            Some(group) => group,
            None => return self.fallback_assignment(request, FallbackReason::EmptyPool),
        };

        // 提交
        let identity = winner.base_identity().to_string();
        let voice_id = winner.resolve_emotion(&request.emotion);
        session.commit(request.character.clone(), identity.clone());

        VoiceAssignment {
            voice_id,
            base_identity: identity,
            source: AssignmentSource::Scored {
                score: best_score,
                pool_reused,
            },
        }
    }

    fn fallback_assignment(&self, request: &CastingRequest, reason: FallbackReason) -> VoiceAssignment {
        let (voice_id, identity) = smart_fallback_voice(request.gender, request.age_band);
        VoiceAssignment {
            voice_id,
            base_identity: identity.to_string(),
            source: AssignmentSource::SmartFallback(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::RawVoiceRecord;
    use rand::SeedableRng;

    fn record(id: &str, label: &str, description: &str) -> RawVoiceRecord {
        RawVoiceRecord {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }

    fn registry(records: Vec<RawVoiceRecord>) -> VoiceRegistry {
        VoiceRegistry::new(Arc::new(VoiceCatalog::from_records(records)))
    }

    fn request(character: &str, emotion: &str) -> CastingRequest {
        CastingRequest {
            character: CharacterId::new(character).unwrap(),
            gender: None,
            age_band: None,
            style_tags: Vec::new(),
            emotion: emotion.to_string(),
            theme_context: None,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn three_voice_records() -> Vec<RawVoiceRecord> {
        vec![
            record("v-1", "가레스(중립)", "남성, 중년, 저음, 맑음, 따뜻한"),
            record("v-2", "가레스(분노)", "남성, 중년, 저음, 맑음, 따뜻한"),
            record("v-3", "나디스(중립)", "여성, 청년, 고음, 맑음, 부드러운"),
            record("v-4", "갈도르(중립)", "남성, 노년, 중음, 거침, 진중한, 낮은"),
        ]
    }

    #[test]
    fn test_same_character_keeps_identity_across_emotions() {
        let registry = registry(three_voice_records());
        let mut session = CastingSession::default();
        let mut rng = rng();

        let first = registry.assign(&mut session, &request("char_01", "중립"), None, &mut rng);
        let second = registry.assign(&mut session, &request("char_01", "분노"), None, &mut rng);

        assert_eq!(first.base_identity, second.base_identity);
        assert_eq!(second.source, AssignmentSource::SessionCache);
    }

    #[test]
    fn test_distinct_characters_get_distinct_identities() {
        let registry = registry(three_voice_records());
        let mut session = CastingSession::default();
        let mut rng = rng();

        let a = registry.assign(&mut session, &request("char_01", "중립"), None, &mut rng);
        let b = registry.assign(&mut session, &request("char_02", "중립"), None, &mut rng);
        let c = registry.assign(&mut session, &request("char_03", "중립"), None, &mut rng);

        assert_ne!(a.base_identity, b.base_identity);
        assert_ne!(a.base_identity, c.base_identity);
        assert_ne!(b.base_identity, c.base_identity);
    }

    #[test]
    fn test_exhausted_catalog_allows_reuse() {
        let registry = registry(vec![record("v-1", "가레스", "남성, 중년, 저음")]);
        let mut session = CastingSession::default();
        let mut rng = rng();

        let a = registry.assign(&mut session, &request("char_01", "중립"), None, &mut rng);
        let b = registry.assign(&mut session, &request("char_02", "중립"), None, &mut rng);

        assert_eq!(a.base_identity, "가레스");
        assert_eq!(b.base_identity, "가레스");
        assert!(matches!(
            b.source,
            AssignmentSource::Scored { pool_reused: true, .. }
        ));
        assert_eq!(session.cast_size(), 2);
    }

    #[test]
    fn test_gender_hard_filter() {
        let registry = registry(three_voice_records());
        let mut session = CastingSession::default();
        let mut rng = rng();

        let mut req = request("char_01", "중립");
        req.gender = Some(Gender::Female);
        let assignment = registry.assign(&mut session, &req, None, &mut rng);

        assert_eq!(assignment.base_identity, "나디스");
    }

    #[test]
    fn test_gender_fallback_does_not_touch_session() {
        // 目录里没有女性音色
        let registry = registry(vec![record("v-1", "가레스", "남성, 중년, 저음")]);
        let mut session = CastingSession::default();
        let mut rng = rng();

        let mut req = request("char_01", "중립");
        req.gender = Some(Gender::Female);
        req.age_band = Some(AgeBand::YoungAdult);
        let assignment = registry.assign(&mut session, &req, None, &mut rng);

        assert_eq!(
            assignment.source,
            AssignmentSource::SmartFallback(FallbackReason::GenderExhausted)
        );
        assert_eq!(assignment.base_identity, "나디스");
        assert_eq!(assignment.voice_id.as_str(), "adfc2330-3a22-501b-897d-313d7472f2d8");
        assert_eq!(session.cast_size(), 0);
        assert!(session.used_identities().is_empty());
    }

    #[test]
    fn test_age_fallback_uses_requested_band() {
        // 男性老年不存在, 兜底仍应给老年音色
        let registry = registry(vec![record("v-1", "가레스", "남성, 중년, 저음")]);
        let mut session = CastingSession::default();
        let mut rng = rng();

        let mut req = request("char_01", "중립");
        req.gender = Some(Gender::Male);
        req.age_band = Some(AgeBand::Elder);
        let assignment = registry.assign(&mut session, &req, None, &mut rng);

        assert_eq!(
            assignment.source,
            AssignmentSource::SmartFallback(FallbackReason::AgeExhausted)
        );
        assert_eq!(assignment.base_identity, "갈도르");
    }

    #[test]
    fn test_child_folds_into_teen_bucket() {
        let (voice_id, identity) = smart_fallback_voice(Some(Gender::Male), Some(AgeBand::Child));
        assert_eq!(identity, "깐깐이");
        assert_eq!(voice_id.as_str(), "9e7d201d-a18a-5343-8e05-057a78e6d432");
    }

    #[test]
    fn test_external_cache_wins_over_session() {
        let registry = registry(three_voice_records());
        let mut session = CastingSession::default();
        session.commit(CharacterId::new("char_01").unwrap(), "가레스".to_string());

        let mut external = BTreeMap::new();
        external.insert(CharacterId::new("char_01").unwrap(), "나디스".to_string());

        let mut rng = rng();
        let assignment =
            registry.assign(&mut session, &request("char_01", "중립"), Some(&external), &mut rng);

        assert_eq!(assignment.base_identity, "나디스");
        assert_eq!(assignment.source, AssignmentSource::ExternalCache);
    }

    #[test]
    fn test_stale_external_cache_falls_through() {
        let registry = registry(three_voice_records());
        let mut session = CastingSession::default();

        let mut external = BTreeMap::new();
        external.insert(CharacterId::new("char_01").unwrap(), "사라진음색".to_string());

        let mut rng = rng();
        let assignment =
            registry.assign(&mut session, &request("char_01", "중립"), Some(&external), &mut rng);

        assert!(matches!(assignment.source, AssignmentSource::Scored { .. }));
        assert!(registry.catalog().contains(&assignment.base_identity));
    }

    #[test]
    fn test_externally_used_identities_excluded_from_pool() {
        let registry = registry(three_voice_records());
        let mut session = CastingSession::default();

        let mut external = BTreeMap::new();
        external.insert(CharacterId::new("char_09").unwrap(), "가레스".to_string());

        let mut rng = rng();
        let mut req = request("char_01", "중립");
        req.gender = Some(Gender::Male);
        let assignment = registry.assign(&mut session, &req, Some(&external), &mut rng);

        // 가레스 被外部占用, 男性候选只剩 갈도르
        assert_eq!(assignment.base_identity, "갈도르");
    }

    #[test]
    fn test_theme_scoring_prefers_matching_tags() {
        let records = vec![
            record("v-1", "밝은이", "남성, 중년, 고음, 맑음, 따뜻한, 밝은"),
            record("v-2", "묵직이", "남성, 중년, 저음, 굵음, 진중한, 낮은"),
        ];
        let registry = registry(records);
        let mut session = CastingSession::default();
        let mut rng = rng();

        let mut req = request("char_01", "중립");
        req.gender = Some(Gender::Male);
        req.theme_context = Some("비 내리는 noir 도시의 뒷골목".to_string());
        let assignment = registry.assign(&mut session, &req, None, &mut rng);

        // noir 偏好 (진중한/낮은) 得 6 分, 随机抖动 <0.5 无法翻盘
        assert_eq!(assignment.base_identity, "묵직이");
    }

    #[test]
    fn test_session_world_theme_used_when_request_has_none() {
        let records = vec![
            record("v-1", "밝은이", "남성, 중년, 고음, 맑음, 따뜻한, 밝은"),
            record("v-2", "묵직이", "남성, 중년, 저음, 굵음, 진중한, 낮은"),
        ];
        let registry = registry(records);
        let mut session = CastingSession::new(Some("그림자 가득한 범죄 도시".to_string()));
        let mut rng = rng();

        let mut req = request("char_01", "중립");
        req.gender = Some(Gender::Male);
        let assignment = registry.assign(&mut session, &req, None, &mut rng);

        assert_eq!(assignment.base_identity, "묵직이");
    }

    #[test]
    fn test_style_tags_break_even_pools() {
        let records = vec![
            record("v-1", "첫째", "남성, 중년, 중음, 맑음, 용감한"),
            record("v-2", "둘째", "남성, 중년, 중음, 맑음, 소심한"),
        ];
        let registry = registry(records);
        let mut session = CastingSession::default();
        let mut rng = rng();

        let mut req = request("char_01", "중립");
        req.style_tags = vec!["소심한".to_string()];
        let assignment = registry.assign(&mut session, &req, None, &mut rng);

        assert_eq!(assignment.base_identity, "둘째");
    }

    #[test]
    fn test_unknown_emotion_resolves_to_neutral() {
        let registry = registry(three_voice_records());
        let mut session = CastingSession::default();
        let mut rng = rng();

        let mut req = request("char_01", "ecstatic");
        req.gender = Some(Gender::Male);
        req.age_band = Some(AgeBand::MiddleAged);
        let assignment = registry.assign(&mut session, &req, None, &mut rng);

        assert_eq!(assignment.base_identity, "가레스");
        assert_eq!(assignment.voice_id.as_str(), "v-1");
    }

    #[test]
    fn test_known_emotion_resolves_to_variant() {
        let registry = registry(three_voice_records());
        let mut session = CastingSession::default();
        let mut rng = rng();

        let mut req = request("char_01", "분노");
        req.gender = Some(Gender::Male);
        req.age_band = Some(AgeBand::MiddleAged);
        let assignment = registry.assign(&mut session, &req, None, &mut rng);

        assert_eq!(assignment.voice_id.as_str(), "v-2");
    }

    #[test]
    fn test_empty_catalog_smart_fallback() {
        let registry = registry(Vec::new());
        let mut session = CastingSession::default();
        let mut rng = rng();

        let assignment = registry.assign(&mut session, &request("char_01", "중립"), None, &mut rng);

        assert_eq!(
            assignment.source,
            AssignmentSource::SmartFallback(FallbackReason::EmptyCatalog)
        );
        assert_eq!(assignment.base_identity, "가레스");
        assert_eq!(session.cast_size(), 0);
    }
}
