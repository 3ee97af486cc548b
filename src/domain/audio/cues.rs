//! Audio Context - 音效提示词库
//!
//! 30 个音效/配乐类别的关键词表。叙事上下文按命中关键词的
//! 字符长度加权打分, 最高分的类别胜出, 同一类别 ID 可在外部
//! 缓存里复用同一段音频。

use serde::{Deserialize, Serialize};

/// 音频种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueKind {
    Sfx,
    Bgm,
}

impl CueKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sfx => "sfx",
            Self::Bgm => "bgm",
        }
    }
}

/// 音频类别 - 关键词全部小写
#[derive(Debug, Clone, Copy)]
pub struct CueCategory {
    pub id: &'static str,
    pub kind: CueKind,
    pub keywords: &'static [&'static str],
    pub description: &'static str,
}

/// 类别命中
#[derive(Debug, Clone, Copy)]
pub struct CueMatch {
    pub category: &'static CueCategory,
    pub score: usize,
}

/// 类别表 - 天气/群众/脚步/机械/门/环境/战斗音效 + 五种配乐
pub const CUE_CATEGORIES: [CueCategory; 30] = [
    CueCategory {
        id: "weather_rain",
        kind: CueKind::Sfx,
        keywords: &["비", "빗소리", "rain", "장마", "빗물", "폭우", "소나기"],
        description: "Rain sounds",
    },
    CueCategory {
        id: "weather_thunder",
        kind: CueKind::Sfx,
        keywords: &["천둥", "번개", "thunder", "뇌우"],
        description: "Thunder",
    },
    CueCategory {
        id: "weather_wind",
        kind: CueKind::Sfx,
        keywords: &["바람", "wind", "폭풍", "돌풍"],
        description: "Wind sounds",
    },
    CueCategory {
        id: "crowd_busy",
        kind: CueKind::Sfx,
        keywords: &["군중", "사람들", "붐비는", "시장", "번화가", "혼잡"],
        description: "Busy crowd",
    },
    CueCategory {
        id: "crowd_murmur",
        kind: CueKind::Sfx,
        keywords: &["웅성", "수군", "속삭임", "대화", "잡담"],
        description: "Murmuring crowd",
    },
    CueCategory {
        id: "crowd_cheer",
        kind: CueKind::Sfx,
        keywords: &["환호", "박수", "축하", "응원"],
        description: "Cheering crowd",
    },
    CueCategory {
        id: "footsteps_run",
        kind: CueKind::Sfx,
        keywords: &["달리는", "뛰는", "달려", "질주", "도망", "run"],
        description: "Running footsteps",
    },
    CueCategory {
        id: "footsteps_walk",
        kind: CueKind::Sfx,
        keywords: &["걷는", "발걸음", "걸어", "walk", "천천히"],
        description: "Walking footsteps",
    },
    CueCategory {
        id: "footsteps_sneak",
        kind: CueKind::Sfx,
        keywords: &["살금살금", "몰래", "숨어", "sneak", "조용히"],
        description: "Sneaking footsteps",
    },
    CueCategory {
        id: "machine_hum",
        kind: CueKind::Sfx,
        keywords: &["기계", "윙윙", "장치", "작동", "모터", "hum"],
        description: "Machine humming",
    },
    CueCategory {
        id: "machine_boot",
        kind: CueKind::Sfx,
        keywords: &["부팅", "시동", "전원", "켜지", "boot", "활성화"],
        description: "Boot/startup sound",
    },
    CueCategory {
        id: "machine_beep",
        kind: CueKind::Sfx,
        keywords: &["비프", "알림", "경고음", "beep", "신호"],
        description: "Beep/alert sound",
    },
    CueCategory {
        id: "machine_glitch",
        kind: CueKind::Sfx,
        keywords: &["글리치", "오류", "노이즈", "glitch", "깨지"],
        description: "Glitch/error sound",
    },
    CueCategory {
        id: "machine_welding",
        kind: CueKind::Sfx,
        keywords: &["용접", "용접기", "스파크", "weld", "불꽃"],
        description: "Welding sound",
    },
    CueCategory {
        id: "door_open",
        kind: CueKind::Sfx,
        keywords: &["문", "열리", "삐걱", "door", "출입"],
        description: "Door opening",
    },
    CueCategory {
        id: "door_knock",
        kind: CueKind::Sfx,
        keywords: &["노크", "두드리", "knock", "똑똑"],
        description: "Door knock",
    },
    CueCategory {
        id: "door_slam",
        kind: CueKind::Sfx,
        keywords: &["쾅", "닫히", "slam", "문닫"],
        description: "Door slamming",
    },
    CueCategory {
        id: "ambient_night",
        kind: CueKind::Sfx,
        keywords: &["밤", "귀뚜라미", "고요", "적막", "night", "야간"],
        description: "Night ambience",
    },
    CueCategory {
        id: "ambient_city",
        kind: CueKind::Sfx,
        keywords: &["도시", "네온", "차소리", "교통", "city", "거리"],
        description: "City ambience",
    },
    CueCategory {
        id: "ambient_forest",
        kind: CueKind::Sfx,
        keywords: &["숲", "새소리", "자연", "forest", "나무"],
        description: "Forest ambience",
    },
    CueCategory {
        id: "ambient_water",
        kind: CueKind::Sfx,
        keywords: &["물", "파도", "강", "개울", "water", "흐르"],
        description: "Water sounds",
    },
    CueCategory {
        id: "combat_punch",
        kind: CueKind::Sfx,
        keywords: &["때리", "주먹", "타격", "punch", "맞"],
        description: "Punch impact",
    },
    CueCategory {
        id: "combat_slash",
        kind: CueKind::Sfx,
        keywords: &["베다", "칼", "검", "slash", "휘두르"],
        description: "Blade slash",
    },
    CueCategory {
        id: "combat_gunshot",
        kind: CueKind::Sfx,
        keywords: &["총", "발사", "총성", "gun", "shot"],
        description: "Gunshot",
    },
    CueCategory {
        id: "combat_explosion",
        kind: CueKind::Sfx,
        keywords: &["폭발", "터지", "explosion", "boom", "파괴"],
        description: "Explosion",
    },
    CueCategory {
        id: "bgm_tension",
        kind: CueKind::Bgm,
        keywords: &["긴장", "추격", "위험", "스릴", "tension", "chase"],
        description: "Tension/chase music",
    },
    CueCategory {
        id: "bgm_peaceful",
        kind: CueKind::Bgm,
        keywords: &["평화", "고요", "안전", "휴식", "peaceful", "calm"],
        description: "Peaceful music",
    },
    CueCategory {
        id: "bgm_mystery",
        kind: CueKind::Bgm,
        keywords: &["미스터리", "수수께끼", "의문", "mystery", "이상한"],
        description: "Mystery music",
    },
    CueCategory {
        id: "bgm_sad",
        kind: CueKind::Bgm,
        keywords: &["슬픔", "눈물", "이별", "안타까", "sad", "애잔"],
        description: "Sad music",
    },
    CueCategory {
        id: "bgm_action",
        kind: CueKind::Bgm,
        keywords: &["액션", "전투", "싸움", "action", "battle", "fight"],
        description: "Action/battle music",
    },
];

/// 按叙事上下文匹配音频类别
///
/// 每个命中的关键词按字符数累加得分, 长关键词更具体所以权重
/// 更高。严格大于才更换优胜者, 同分保留表序靠前者; 零分返回
/// None。
pub fn match_cue_category(context: &str, kind: Option<CueKind>) -> Option<CueMatch> {
    let lowered = context.to_lowercase();

    let mut best: Option<&'static CueCategory> = None;
    let mut best_score = 0usize;
    for category in CUE_CATEGORIES.iter() {
        if let Some(wanted) = kind {
            if category.kind != wanted {
                continue;
            }
        }

        let score: usize = category
            .keywords
            .iter()
            .filter(|keyword| lowered.contains(**keyword))
            .map(|keyword| keyword.chars().count())
            .sum();

        if score > best_score {
            best_score = score;
            best = Some(category);
        }
    }

    best.map(|category| CueMatch {
        category,
        score: best_score,
    })
}
