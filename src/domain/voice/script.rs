//! 对白脚本预处理
//!
//! 送进语音合成前剥掉标记段与长舞台指示, 并按
//! 身体 > 心理 > 情绪 的优先级决定有效状态。

/// 有效状态: 身体 > 心理 > 情绪, 空白串视同缺省
pub fn effective_state<'a>(
    physical: Option<&'a str>,
    psychological: Option<&'a str>,
    emotion: Option<&'a str>,
) -> &'a str {
    [physical, psychological, emotion]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .unwrap_or("중립")
}

/// 清理对白文本
///
/// 去掉 <...> 标记段与 ≥12 字符的括号舞台指示 (折叠为逗号,
/// 短促呼吸词如 "(윽!)" 保留)。清理后为空返回 None。
pub fn prepare_dialogue(text: &str) -> Option<String> {
    let cleaned = collapse_stage_directions(&strip_markup(text));
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 去掉 <...> 标记段, 未闭合的 '<' 原样保留
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(offset) => rest = &rest[open + offset + 1..],
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// 长括号指示的判定阈值 (字符数)
const STAGE_DIRECTION_MIN_CHARS: usize = 12;

/// 折叠长括号舞台指示为逗号
fn collapse_stage_directions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        out.push_str(&rest[..open]);
        match rest[open..].find(')') {
            Some(offset) => {
                let content = &rest[open + 1..open + offset];
                if content.chars().count() >= STAGE_DIRECTION_MIN_CHARS {
                    out.push(',');
                } else {
                    out.push_str(&rest[open..open + offset + 1]);
                }
                rest = &rest[open + offset + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_tags_removed() {
        assert_eq!(
            prepare_dialogue("<whisper>조용히 와</whisper>").as_deref(),
            Some("조용히 와")
        );
    }

    #[test]
    fn test_unclosed_angle_bracket_kept() {
        assert_eq!(prepare_dialogue("3 < 5 라니까").as_deref(), Some("3 < 5 라니까"));
    }

    #[test]
    fn test_long_stage_direction_collapsed() {
        let cleaned = prepare_dialogue("(무거운 한숨을 길게 쉬며) 알겠다");
        assert_eq!(cleaned.as_deref(), Some(", 알겠다"));
    }

    #[test]
    fn test_short_breath_cue_kept() {
        assert_eq!(
            prepare_dialogue("(윽!) 괜찮아").as_deref(),
            Some("(윽!) 괜찮아")
        );
    }

    #[test]
    fn test_markup_only_text_is_empty() {
        assert_eq!(prepare_dialogue("<pause> <breath>"), None);
        assert_eq!(prepare_dialogue("   "), None);
    }

    #[test]
    fn test_direction_only_text_keeps_comma() {
        // 整句只有舞台指示时折叠结果是一个逗号, 不算空
        assert_eq!(
            prepare_dialogue("(조용히 창밖을 바라보며 고개를 끄덕인다)").as_deref(),
            Some(",")
        );
    }

    #[test]
    fn test_effective_state_precedence() {
        assert_eq!(effective_state(Some("빈사"), Some("공포"), Some("슬픔")), "빈사");
        assert_eq!(effective_state(None, Some("공포"), Some("슬픔")), "공포");
        assert_eq!(effective_state(Some(""), None, Some("슬픔")), "슬픔");
        assert_eq!(effective_state(None, None, None), "중립");
    }
}
