//! Scene Context - Value Objects

use serde::{Deserialize, Serialize};

/// 资产种类 - 场所与人物两个命名空间互不碰撞
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Location,
    Character,
}

impl AssetKind {
    /// 生成资产 ID 时的前缀
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Location => "loc",
            Self::Character => "char",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Character => "character",
        }
    }
}

/// 时段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeOfDay {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "dawn" => Some(Self::Dawn),
            "day" => Some(Self::Day),
            "dusk" => Some(Self::Dusk),
            "night" => Some(Self::Night),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dawn => "dawn",
            Self::Day => "day",
            Self::Dusk => "dusk",
            Self::Night => "night",
        }
    }
}

/// 天气
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Clear,
    Cloudy,
    Rain,
    Fog,
    Snow,
}

impl Weather {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "clear" => Some(Self::Clear),
            "cloudy" => Some(Self::Cloudy),
            "rain" => Some(Self::Rain),
            "fog" => Some(Self::Fog),
            "snow" => Some(Self::Snow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::Rain => "rain",
            Self::Fog => "fog",
            Self::Snow => "snow",
        }
    }
}

/// 状态键 - "{时段}_{天气}_{情境}"
///
/// 语义相同的场景状态必然产生相同的键。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey(String);

impl StateKey {
    pub fn from_parts(time: TimeOfDay, weather: Weather, event: &str) -> Self {
        Self(format!("{}_{}_{}", time.as_str(), weather.as_str(), event))
    }

    /// 调用方显式传入的完整键, 原样使用
    pub fn raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 当前场景状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneState {
    pub time: TimeOfDay,
    pub weather: Weather,
    /// 情境标签, 自由文本 (如 "peaceful", "chase")
    pub event: String,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            time: TimeOfDay::Day,
            weather: Weather::Clear,
            event: "peaceful".to_string(),
        }
    }
}

impl SceneState {
    pub fn state_key(&self) -> StateKey {
        StateKey::from_parts(self.time, self.weather, &self.event)
    }

    /// 应用部分更新, None 字段保持原值
    pub fn apply(&mut self, patch: ScenePatch) {
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(weather) = patch.weather {
            self.weather = weather;
        }
        if let Some(event) = patch.event {
            self.event = event;
        }
    }
}

/// 场景状态的部分更新
#[derive(Debug, Clone, Default)]
pub struct ScenePatch {
    pub time: Option<TimeOfDay>,
    pub weather: Option<Weather>,
    pub event: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_key_deterministic() {
        let a = StateKey::from_parts(TimeOfDay::Night, Weather::Rain, "chase");
        let b = StateKey::from_parts(TimeOfDay::Night, Weather::Rain, "chase");
        let c = StateKey::from_parts(TimeOfDay::Night, Weather::Fog, "chase");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str(), "night_rain_chase");
    }

    #[test]
    fn test_default_scene_key() {
        assert_eq!(SceneState::default().state_key().as_str(), "day_clear_peaceful");
    }

    #[test]
    fn test_scene_patch_partial() {
        let mut scene = SceneState::default();
        scene.apply(ScenePatch {
            time: Some(TimeOfDay::Dusk),
            weather: None,
            event: Some("investigation".to_string()),
        });

        assert_eq!(scene.time, TimeOfDay::Dusk);
        assert_eq!(scene.weather, Weather::Clear);
        assert_eq!(scene.state_key().as_str(), "dusk_clear_investigation");
    }
}
