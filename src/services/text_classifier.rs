//! 文本分类 - 业务能力层
//!
//! 规范化空白，并判断一段文字是日文还是英文

use crate::models::Chunk;

/// 把任意连续空白压成一个空格并去掉首尾空白
pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 平假名、片假名、中日韩统一表意文字
pub fn is_japanese_char(c: char) -> bool {
    matches!(
        c,
        '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FFF}'
    )
}

pub fn contains_japanese(text: &str) -> bool {
    text.chars().any(is_japanese_char)
}

/// 规范化并分类，规范化后为空时不产生文本块
pub fn classify(raw: &str) -> Option<Chunk> {
    let text = normalize_whitespace(raw);
    if text.is_empty() {
        return None;
    }
    if contains_japanese(&text) {
        Some(Chunk::Japanese { text })
    } else {
        Some(Chunk::English { text })
    }
}

/// 分类成文本序列（空文字得到空序列）
pub fn classify_text(raw: &str) -> Vec<Chunk> {
    classify(raw).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_japanese_ranges() {
        for sample in ["ひらがな", "カタカナ", "漢字", "He said はい."] {
            assert!(matches!(classify(sample), Some(Chunk::Japanese { .. })), "{}", sample);
        }
    }

    #[test]
    fn test_ascii_is_english() {
        assert_eq!(classify("  Hello   world \n"), Some(Chunk::english("Hello world")));
        assert!(matches!(classify("③-① ①to the"), Some(Chunk::English { .. })));
    }

    #[test]
    fn test_empty_after_normalization_is_dropped() {
        assert_eq!(classify(" \n\t\u{3000}"), None);
        assert!(classify_text("").is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = ["  a  b\n\nc ", "東京\u{3000}\u{3000}です", "", "x"];
        for sample in samples {
            let once = normalize_whitespace(sample);
            assert_eq!(normalize_whitespace(&once), once);
        }
    }
}
