//! Casting Context - Value Objects

use serde::{Deserialize, Serialize};

/// 音色唯一标识
///
/// 由外部 TTS 供应商的目录分配, 对本系统完全不透明。
/// 空 ID 在目录解析阶段拒收, 这里不再校验。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 角色稳定标识
///
/// 不变量:
/// - 必须是叙事层分配的持久 ID, 不是可变的显示名
/// - 同一角色在整个会话中保持不变
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(String);

impl CharacterId {
    pub fn new(id: impl Into<String>) -> Result<Self, &'static str> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("角色 ID 不能为空");
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 世界标识 - 一次互动小说游玩实例
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(String);

impl WorldId {
    pub fn new(id: impl Into<String>) -> Result<Self, &'static str> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("世界 ID 不能为空");
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 性别 - 硬过滤维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// 从自由文本标签归一化
    ///
    /// 女性关键词先于男性检查: "female" 包含 "male"。
    /// 无法识别时回落到男性 (目录中男性音色占多数)。
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        const FEMALE: [&str; 4] = ["여성", "female", "우먼", "여자"];
        const MALE: [&str; 4] = ["남성", "male", "맨", "남자"];

        if FEMALE.iter().any(|k| normalized.contains(k)) {
            return Self::Female;
        }
        if MALE.iter().any(|k| normalized.contains(k)) {
            return Self::Male;
        }
        Self::Male
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "남성",
            Self::Female => "여성",
        }
    }
}

/// 年龄段 - 硬过滤维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBand {
    Child,
    Teen,
    YoungAdult,
    MiddleAged,
    Elder,
}

impl AgeBand {
    /// 从自由文本标签归一化
    ///
    /// 包含匹配, 检查顺序从年幼到年长。YoungAdult 必须先于
    /// MiddleAged: "young adult" 应命中 "young" 而不是 "adult"。
    /// 无法识别时回落到青年。
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();

        const CHILD: [&str; 4] = ["어린이", "아이", "child", "kid"];
        const TEEN: [&str; 3] = ["청소년", "학생", "teen"];
        const YOUNG: [&str; 2] = ["청년", "young"];
        const MIDDLE: [&str; 5] = ["중년", "아저씨", "성인", "adult", "middle"];
        const ELDER: [&str; 8] = [
            "노년", "노인", "할아버지", "할머니", "elderly", "elder", "grandpa", "grandma",
        ];

        if CHILD.iter().any(|k| normalized.contains(k)) {
            return Self::Child;
        }
        if TEEN.iter().any(|k| normalized.contains(k)) {
            return Self::Teen;
        }
        if YOUNG.iter().any(|k| normalized.contains(k)) {
            return Self::YoungAdult;
        }
        if MIDDLE.iter().any(|k| normalized.contains(k)) {
            return Self::MiddleAged;
        }
        if ELDER.iter().any(|k| normalized.contains(k)) || normalized.contains("old") {
            return Self::Elder;
        }
        Self::YoungAdult
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Child => "어린이",
            Self::Teen => "청소년",
            Self::YoungAdult => "청년",
            Self::MiddleAged => "중년",
            Self::Elder => "노년",
        }
    }

    /// 兜底音色表只有四个年龄桶, 儿童并入青少年
    pub fn fallback_bucket(&self) -> Self {
        match self {
            Self::Child => Self::Teen,
            other => *other,
        }
    }
}

/// 朗读调音参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceTuning {
    /// 语速 (0.5 - 2.0)
    pub speed: f64,
    /// 音调 (0.5 - 2.0)
    pub pitch: f64,
}

impl Default for VoiceTuning {
    fn default() -> Self {
        Self {
            speed: 1.0,
            pitch: 1.0,
        }
    }
}

impl VoiceTuning {
    pub const MIN: f64 = 0.5;
    pub const MAX: f64 = 2.0;

    pub fn new(speed: f64, pitch: f64) -> Self {
        Self { speed, pitch }
    }

    /// 裁剪到合法区间并保留两位小数
    pub fn clamped(&self) -> Self {
        Self {
            speed: round2(self.speed.clamp(Self::MIN, Self::MAX)),
            pitch: round2(self.pitch.clamp(Self::MIN, Self::MAX)),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// 情绪标签归一化
///
/// 目录里中韩英标签混用, "중립" 与 "neutral" 指同一中性记录,
/// 统一折叠到 "neutral" 使后续解析链完全确定。
pub fn canonical_emotion(label: &str) -> String {
    let normalized = label.trim().to_lowercase();
    if normalized.is_empty() || normalized == "중립" {
        return "neutral".to_string();
    }
    normalized
}

pub const NEUTRAL_EMOTION: &str = "neutral";
