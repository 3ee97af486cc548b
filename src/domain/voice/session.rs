//! 配音会话状态
//!
//! 单个世界实例内的音色占用集与角色分配表。显式对象,
//! 没有任何模块级可变状态, 由世界管理器持有并独占写入。

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::value_objects::CharacterId;

/// 会话内的配音分配状态
///
/// 不变量:
/// - cast_map 中出现的每个身份都在 used_identities 里
/// - world_theme 不为空白串 (空输入折叠为 None)
/// - 兜底分配不落表, 属性修正后同一角色仍可正常配音
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastingSession {
    used_identities: BTreeSet<String>,
    cast_map: BTreeMap<CharacterId, String>,
    world_theme: Option<String>,
}

impl CastingSession {
    pub fn new(world_theme: Option<String>) -> Self {
        Self {
            used_identities: BTreeSet::new(),
            cast_map: BTreeMap::new(),
            world_theme: world_theme.filter(|t| !t.trim().is_empty()),
        }
    }

    /// 从持久化的分配表恢复, 占用集按表内身份重建
    pub fn restore(cast_map: BTreeMap<CharacterId, String>, world_theme: Option<String>) -> Self {
        let used_identities = cast_map.values().cloned().collect();
        Self {
            used_identities,
            cast_map,
            world_theme: world_theme.filter(|t| !t.trim().is_empty()),
        }
    }

    // Getters
    pub fn world_theme(&self) -> Option<&str> {
        self.world_theme.as_deref()
    }

    pub fn assigned_identity(&self, character: &CharacterId) -> Option<&str> {
        self.cast_map.get(character).map(String::as_str)
    }

    pub fn is_used(&self, identity: &str) -> bool {
        self.used_identities.contains(identity)
    }

    pub fn used_identities(&self) -> &BTreeSet<String> {
        &self.used_identities
    }

    pub fn cast_map(&self) -> &BTreeMap<CharacterId, String> {
        &self.cast_map
    }

    pub fn cast_size(&self) -> usize {
        self.cast_map.len()
    }

    /// 提交一次评分通过的分配
    pub fn commit(&mut self, character: CharacterId, identity: String) {
        self.used_identities.insert(identity.clone());
        self.cast_map.insert(character, identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(id: &str) -> CharacterId {
        CharacterId::new(id).unwrap()
    }

    #[test]
    fn test_commit_tracks_usage() {
        let mut session = CastingSession::new(Some("noir".to_string()));
        session.commit(character("char_01"), "가레스".to_string());

        assert!(session.is_used("가레스"));
        assert_eq!(session.assigned_identity(&character("char_01")), Some("가레스"));
        assert_eq!(session.cast_size(), 1);
    }

    #[test]
    fn test_blank_theme_folds_to_none() {
        let session = CastingSession::new(Some("   ".to_string()));
        assert_eq!(session.world_theme(), None);
    }

    #[test]
    fn test_restore_rebuilds_used_set() {
        let mut cast_map = BTreeMap::new();
        cast_map.insert(character("char_01"), "가레스".to_string());
        cast_map.insert(character("char_02"), "나디스".to_string());

        let session = CastingSession::restore(cast_map, None);
        assert!(session.is_used("가레스"));
        assert!(session.is_used("나디스"));
        assert_eq!(session.cast_size(), 2);
    }
}
