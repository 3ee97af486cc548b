//! Scene Context - 视觉资产库
//!
//! 一个世界的场所/人物立绘缓存。按状态键决定是取缓存、派生
//! 变体还是生成新基础图, 把昂贵的图像生成调用压到最少。

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::value_objects::{AssetKind, SceneState, ScenePatch, StateKey};

/// 生成失败的占位图特征串, 含其一即拒绝入库
const ERROR_IMAGE_MARKERS: [&str; 2] = ["GENERATION ERROR", "svg+xml"];

/// 建议资产 ID 的名称部分上限 (字符数)
const SUGGESTED_ID_NAME_CHARS: usize = 20;

/// 图像引用是否为失败占位
pub fn is_error_image(image_ref: &str) -> bool {
    ERROR_IMAGE_MARKERS.iter().any(|marker| image_ref.contains(marker))
}

/// 为新资产生成建议 ID: "{前缀}_{净化名}_{6 位 base36 后缀}"
///
/// 名称小写化后, [a-z0-9가-힣] 之外的字符替换成 '_', 截断到
/// 20 个字符。
pub fn suggest_asset_id(kind: AssetKind, name: &str, rng: &mut StdRng) -> String {
    const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let sanitized: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || ('가'..='힣').contains(&c) {
                c
            } else {
                '_'
            }
        })
        .take(SUGGESTED_ID_NAME_CHARS)
        .collect();

    let suffix: String = (0..6)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{}_{}_{}", kind.prefix(), sanitized, suffix)
}

/// 缓存决策
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDecision {
    /// 该状态已有成品图, 直接取用
    Retrieve {
        asset_id: String,
        state_key: StateKey,
        image_url: String,
    },
    /// 资产已有基础图, 为新状态派生变体
    Variation {
        asset_id: String,
        base_image_url: String,
        new_state_key: StateKey,
    },
    /// 未知资产, 需要生成全新基础图
    NewBase {
        suggested_id: String,
        state_key: StateKey,
    },
}

/// 入库结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Stored,
    /// 图像引用是失败占位, 拒绝写入
    RejectedSentinel,
    /// 变体指向不存在的资产, 不做任何修改
    UnknownAsset,
}

/// 视觉资产条目
///
/// 不变量:
/// - variations 总是包含创建时刻状态键对应的条目
/// - base_image 与各变体引用都不是失败占位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    id: String,
    kind: AssetKind,
    display_name: String,
    base_image: String,
    variations: BTreeMap<StateKey, String>,
    created_at: DateTime<Utc>,
}

impl AssetEntry {
    /// 从持久化字段重建条目
    pub fn restore(
        id: String,
        kind: AssetKind,
        display_name: String,
        base_image: String,
        variations: BTreeMap<StateKey, String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            display_name,
            base_image,
            variations,
            created_at,
        }
    }

    // Getters
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn base_image(&self) -> &str {
        &self.base_image
    }

    pub fn variations(&self) -> &BTreeMap<StateKey, String> {
        &self.variations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn variation(&self, state_key: &StateKey) -> Option<&str> {
        self.variations.get(state_key).map(String::as_str)
    }

    pub fn has_state(&self, state_key: &StateKey) -> bool {
        self.variations.contains_key(state_key)
    }
}

/// 视觉资产库 - 场所与人物两个命名空间 + 当前场景状态
///
/// 不变量:
/// - 条目保持入库顺序, 模糊查找的先到先得依赖这一点
/// - 同一命名空间内 ID 唯一, 重复入库覆盖原条目
#[derive(Debug, Clone, Default)]
pub struct AssetLibrary {
    locations: Vec<AssetEntry>,
    characters: Vec<AssetEntry>,
    scene: SceneState,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从持久化条目重建资产库
    ///
    /// 场景状态不持久化, 重建后回到缺省值。
    pub fn restore(locations: Vec<AssetEntry>, characters: Vec<AssetEntry>) -> Self {
        Self {
            locations,
            characters,
            scene: SceneState::default(),
        }
    }

    // Getters
    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn entries(&self, kind: AssetKind) -> &[AssetEntry] {
        match kind {
            AssetKind::Location => &self.locations,
            AssetKind::Character => &self.characters,
        }
    }

    pub fn get(&self, kind: AssetKind, id: &str) -> Option<&AssetEntry> {
        self.entries(kind).iter().find(|entry| entry.id == id)
    }

    /// 当前场景的状态键
    pub fn current_state_key(&self) -> StateKey {
        self.scene.state_key()
    }

    /// 部分更新场景状态
    pub fn update_scene(&mut self, patch: ScenePatch) {
        self.scene.apply(patch);
    }

    /// 按显示名查找: 先精确匹配, 再双向包含, 都取最先入库者
    pub fn find_by_name(&self, kind: AssetKind, name: &str) -> Option<&AssetEntry> {
        let entries = self.entries(kind);
        entries
            .iter()
            .find(|entry| entry.display_name == name)
            .or_else(|| {
                entries.iter().find(|entry| {
                    entry.display_name.contains(name) || name.contains(&entry.display_name)
                })
            })
    }

    /// 为命名资产在指定状态下做缓存决策
    ///
    /// state_key 缺省时用当前场景状态。决策不修改库内容。
    pub fn decide(
        &self,
        kind: AssetKind,
        name: &str,
        state_key: Option<StateKey>,
        rng: &mut StdRng,
    ) -> CacheDecision {
        let key = state_key.unwrap_or_else(|| self.current_state_key());

        let entry = match self.find_by_name(kind, name) {
            Some(entry) => entry,
            None => {
                return CacheDecision::NewBase {
                    suggested_id: suggest_asset_id(kind, name, rng),
                    state_key: key,
                }
            }
        };

        match entry.variation(&key) {
            Some(url) => CacheDecision::Retrieve {
                asset_id: entry.id.clone(),
                state_key: key,
                image_url: url.to_string(),
            },
            None => CacheDecision::Variation {
                asset_id: entry.id.clone(),
                base_image_url: entry.base_image.clone(),
                new_state_key: key,
            },
        }
    }

    /// 新资产入库, 基础图同时作为创建时刻状态的变体
    ///
    /// 同 ID 重复入库覆盖原条目并保留位置。
    pub fn save_new_asset(
        &mut self,
        kind: AssetKind,
        id: String,
        display_name: String,
        base_image: String,
        state_key: StateKey,
    ) -> SaveOutcome {
        if is_error_image(&base_image) {
            return SaveOutcome::RejectedSentinel;
        }

        let mut variations = BTreeMap::new();
        variations.insert(state_key, base_image.clone());
        let entry = AssetEntry {
            id,
            kind,
            display_name,
            base_image,
            variations,
            created_at: Utc::now(),
        };

        let entries = self.entries_mut(kind);
        match entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        SaveOutcome::Stored
    }

    /// 为已有资产登记一个状态变体, 同键覆盖
    pub fn save_variation(
        &mut self,
        kind: AssetKind,
        asset_id: &str,
        state_key: StateKey,
        image_url: String,
    ) -> SaveOutcome {
        if is_error_image(&image_url) {
            return SaveOutcome::RejectedSentinel;
        }

        match self
            .entries_mut(kind)
            .iter_mut()
            .find(|entry| entry.id == asset_id)
        {
            Some(entry) => {
                entry.variations.insert(state_key, image_url);
                SaveOutcome::Stored
            }
            None => SaveOutcome::UnknownAsset,
        }
    }

    /// 入库顺序的显示名清单
    pub fn display_names(&self, kind: AssetKind) -> Vec<String> {
        self.entries(kind)
            .iter()
            .map(|entry| entry.display_name.clone())
            .collect()
    }

    /// 清空两个命名空间, 场景状态保留
    pub fn clear(&mut self) {
        self.locations.clear();
        self.characters.clear();
    }

    fn entries_mut(&mut self, kind: AssetKind) -> &mut Vec<AssetEntry> {
        match kind {
            AssetKind::Location => &mut self.locations,
            AssetKind::Character => &mut self.characters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::value_objects::{TimeOfDay, Weather};
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn key(raw: &str) -> StateKey {
        StateKey::raw(raw)
    }

    fn library_with_noodle_shop() -> AssetLibrary {
        let mut library = AssetLibrary::new();
        let outcome = library.save_new_asset(
            AssetKind::Location,
            "loc_noodle_01".to_string(),
            "강남 뒷골목 국수집".to_string(),
            "https://img.example/noodle-base.png".to_string(),
            key("day_clear_peaceful"),
        );
        assert_eq!(outcome, SaveOutcome::Stored);
        library
    }

    #[test]
    fn test_unknown_name_yields_new_base() {
        let library = AssetLibrary::new();
        let mut rng = rng();

        let decision = library.decide(AssetKind::Location, "국수집", None, &mut rng);

        match decision {
            CacheDecision::NewBase {
                suggested_id,
                state_key,
            } => {
                assert!(suggested_id.starts_with("loc_국수집_"));
                let suffix = suggested_id.rsplit('_').next().unwrap();
                assert_eq!(suffix.chars().count(), 6);
                assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
                assert_eq!(state_key.as_str(), "day_clear_peaceful");
            }
            other => panic!("expected NewBase, got {:?}", other),
        }
    }

    #[test]
    fn test_cached_state_yields_retrieve() {
        let library = library_with_noodle_shop();
        let mut rng = rng();

        let decision = library.decide(
            AssetKind::Location,
            "강남 뒷골목 국수집",
            Some(key("day_clear_peaceful")),
            &mut rng,
        );

        assert_eq!(
            decision,
            CacheDecision::Retrieve {
                asset_id: "loc_noodle_01".to_string(),
                state_key: key("day_clear_peaceful"),
                image_url: "https://img.example/noodle-base.png".to_string(),
            }
        );
    }

    #[test]
    fn test_new_state_yields_variation() {
        let library = library_with_noodle_shop();
        let mut rng = rng();

        let decision = library.decide(
            AssetKind::Location,
            "강남 뒷골목 국수집",
            Some(key("night_rain_peaceful")),
            &mut rng,
        );

        assert_eq!(
            decision,
            CacheDecision::Variation {
                asset_id: "loc_noodle_01".to_string(),
                base_image_url: "https://img.example/noodle-base.png".to_string(),
                new_state_key: key("night_rain_peaceful"),
            }
        );
    }

    #[test]
    fn test_scene_state_drives_default_key() {
        let mut library = library_with_noodle_shop();
        library.update_scene(ScenePatch {
            time: Some(TimeOfDay::Night),
            weather: Some(Weather::Rain),
            event: None,
        });
        let mut rng = rng();

        let decision = library.decide(AssetKind::Location, "국수집", None, &mut rng);

        assert!(matches!(
            decision,
            CacheDecision::Variation { ref new_state_key, .. }
                if new_state_key.as_str() == "night_rain_peaceful"
        ));
    }

    #[test]
    fn test_fuzzy_lookup_matches_both_directions() {
        let library = library_with_noodle_shop();

        let short = library.find_by_name(AssetKind::Location, "국수집").unwrap();
        assert_eq!(short.id(), "loc_noodle_01");

        let long = library
            .find_by_name(AssetKind::Location, "비 내리는 강남 뒷골목 국수집")
            .unwrap();
        assert_eq!(long.id(), "loc_noodle_01");
    }

    #[test]
    fn test_exact_match_wins_over_containment() {
        let mut library = AssetLibrary::new();
        library.save_new_asset(
            AssetKind::Location,
            "loc_gate".to_string(),
            "경찰서 정문".to_string(),
            "https://img.example/gate.png".to_string(),
            key("day_clear_peaceful"),
        );
        library.save_new_asset(
            AssetKind::Location,
            "loc_station".to_string(),
            "경찰서".to_string(),
            "https://img.example/station.png".to_string(),
            key("day_clear_peaceful"),
        );

        // 精确命中后入库的 "경찰서"
        let exact = library.find_by_name(AssetKind::Location, "경찰서").unwrap();
        assert_eq!(exact.id(), "loc_station");

        // 包含匹配先到先得
        let fuzzy = library.find_by_name(AssetKind::Location, "경찰").unwrap();
        assert_eq!(fuzzy.id(), "loc_gate");
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let mut library = AssetLibrary::new();
        library.save_new_asset(
            AssetKind::Location,
            "loc_1".to_string(),
            "그림자".to_string(),
            "https://img.example/place.png".to_string(),
            key("day_clear_peaceful"),
        );

        assert!(library.find_by_name(AssetKind::Character, "그림자").is_none());
        assert!(library.get(AssetKind::Character, "loc_1").is_none());
    }

    #[test]
    fn test_error_sentinel_rejected_on_save() {
        let mut library = AssetLibrary::new();

        let outcome = library.save_new_asset(
            AssetKind::Character,
            "char_1".to_string(),
            "탐정".to_string(),
            "data:image/svg+xml;base64,xxxx".to_string(),
            key("day_clear_peaceful"),
        );

        assert_eq!(outcome, SaveOutcome::RejectedSentinel);
        assert!(library.entries(AssetKind::Character).is_empty());
    }

    #[test]
    fn test_error_sentinel_rejected_on_variation() {
        let mut library = library_with_noodle_shop();

        let outcome = library.save_variation(
            AssetKind::Location,
            "loc_noodle_01",
            key("night_rain_peaceful"),
            "GENERATION ERROR: quota exceeded".to_string(),
        );

        assert_eq!(outcome, SaveOutcome::RejectedSentinel);
        let entry = library.get(AssetKind::Location, "loc_noodle_01").unwrap();
        assert_eq!(entry.variations().len(), 1);
    }

    #[test]
    fn test_variation_for_unknown_asset_is_noop() {
        let mut library = library_with_noodle_shop();

        let outcome = library.save_variation(
            AssetKind::Location,
            "loc_missing",
            key("night_rain_peaceful"),
            "https://img.example/ghost.png".to_string(),
        );

        assert_eq!(outcome, SaveOutcome::UnknownAsset);
        assert_eq!(library.entries(AssetKind::Location).len(), 1);
    }

    #[test]
    fn test_variation_roundtrip() {
        let mut library = library_with_noodle_shop();
        let night = key("night_rain_peaceful");

        library.save_variation(
            AssetKind::Location,
            "loc_noodle_01",
            night.clone(),
            "https://img.example/noodle-night.png".to_string(),
        );

        let mut rng = rng();
        let decision = library.decide(
            AssetKind::Location,
            "국수집",
            Some(night.clone()),
            &mut rng,
        );

        assert_eq!(
            decision,
            CacheDecision::Retrieve {
                asset_id: "loc_noodle_01".to_string(),
                state_key: night,
                image_url: "https://img.example/noodle-night.png".to_string(),
            }
        );
    }

    #[test]
    fn test_resave_same_id_replaces_entry() {
        let mut library = library_with_noodle_shop();

        library.save_new_asset(
            AssetKind::Location,
            "loc_noodle_01".to_string(),
            "강남 뒷골목 국수집".to_string(),
            "https://img.example/noodle-v2.png".to_string(),
            key("dusk_fog_peaceful"),
        );

        assert_eq!(library.entries(AssetKind::Location).len(), 1);
        let entry = library.get(AssetKind::Location, "loc_noodle_01").unwrap();
        assert_eq!(entry.base_image(), "https://img.example/noodle-v2.png");
        assert!(entry.has_state(&key("dusk_fog_peaceful")));
        assert!(!entry.has_state(&key("day_clear_peaceful")));
    }

    #[test]
    fn test_suggested_id_sanitizes_and_truncates() {
        let mut rng = rng();
        let id = suggest_asset_id(AssetKind::Character, "Neo-Seoul #7 간판 큰 술집!!", &mut rng);

        assert!(id.starts_with("char_"));
        let name_part = &id["char_".len()..id.len() - 7];
        assert_eq!(name_part.chars().count(), 20);
        assert!(name_part
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || ('가'..='힣').contains(&c)));
    }

    #[test]
    fn test_clear_keeps_scene() {
        let mut library = library_with_noodle_shop();
        library.update_scene(ScenePatch {
            time: Some(TimeOfDay::Dusk),
            weather: None,
            event: None,
        });

        library.clear();

        assert!(library.entries(AssetKind::Location).is_empty());
        assert_eq!(library.scene().time, TimeOfDay::Dusk);
    }

    #[test]
    fn test_restore_resets_scene() {
        let mut source = library_with_noodle_shop();
        source.update_scene(ScenePatch {
            time: Some(TimeOfDay::Night),
            weather: None,
            event: None,
        });

        let restored = AssetLibrary::restore(source.entries(AssetKind::Location).to_vec(), Vec::new());

        assert_eq!(restored.entries(AssetKind::Location).len(), 1);
        assert_eq!(restored.scene().time, TimeOfDay::Day);
    }
}
