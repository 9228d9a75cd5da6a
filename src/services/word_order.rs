//! 排序题识别与解析 - 业务能力层
//!
//! 题干用 ①–⑳ 标出英文片段，选项是“③-①”这样的编号组合。
//! 识别条件必须同时满足两条，避免把碰巧含圈号的普通选择题误判。

use crate::markup::Element;
use crate::models::{
    AnswerIndex, Choice, Chunk, DiagnosticKind, JapaneseTranslateWordOrderCombination,
};
use crate::services::choice_extractor::{
    choice_elements, choice_texts, choices_of, is_marked_answer,
};
use crate::services::chunk_builder::{element_chunks, element_chunks_without};
use crate::services::diagnostics::Diagnostics;
use crate::services::text_classifier::normalize_whitespace;
use regex::Regex;
use std::sync::LazyLock;

const CIRCLED_FIRST: u32 = 0x2460; // ①
const CIRCLED_LAST: u32 = 0x2473; // ⑳
/// 识别门槛只看 ①–⑤
const GATE_LAST: u32 = 0x2464;

/// 圈号或数字，中间是连字符、短破折号、长破折号或长音符
static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([\x{2460}-\x{2473}]|[0-9]+)\s*[-\x{2010}\x{2011}\x{2013}\x{2014}\x{2212}\x{30FC}\x{FF0D}]\s*([\x{2460}-\x{2473}]|[0-9]+)\s*$",
    )
    .expect("PAIR_RE")
});

/// 片段里的括号注释（半角或全角）
static PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(（][^()（）]*[)）]").expect("PAREN_RE"));

/// “N番目”（N 可为全角数字）
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9０-９]+)\s*番目").expect("ORDINAL_RE"));

/// 圈号对应的数值，① 为 1
pub fn circled_value(c: char) -> Option<u32> {
    let cp = c as u32;
    (CIRCLED_FIRST..=CIRCLED_LAST)
        .contains(&cp)
        .then(|| cp - CIRCLED_FIRST + 1)
}

fn has_gate_glyph(text: &str) -> bool {
    text.chars()
        .any(|c| (CIRCLED_FIRST..=GATE_LAST).contains(&(c as u32)))
}

fn marker_value(token: &str) -> Option<u32> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if circled_value(c).is_some() => circled_value(c),
        _ => token.parse().ok(),
    }
}

/// 解析“③-①”“3 - 1”“③ – ①”形式的组合选项
pub fn parse_pair_choice_text(text: &str) -> Option<(u32, u32)> {
    let caps = PAIR_RE.captures(text)?;
    Some((marker_value(&caps[1])?, marker_value(&caps[2])?))
}

/// 识别门槛：题干含 ①–⑤ 且第一个选项是编号组合
pub fn is_word_order_text(body: &str, first_choice: Option<&str>) -> bool {
    has_gate_glyph(body) && first_choice.is_some_and(|c| parse_pair_choice_text(c).is_some())
}

/// 题干纯文本：优先 `body` 子元素，否则为除 `choices` 以外的全部内容
pub fn question_body_text(question: &Element) -> String {
    match question.first_child_named("body") {
        Some(body) => body.text_content(),
        None => question.text_content_without(&["choices"]),
    }
}

pub fn is_word_order_question(question: &Element) -> bool {
    let body = question_body_text(question);
    let texts = choice_texts(choices_of(question));
    is_word_order_text(&body, texts.first().map(String::as_str))
}

/// 圈号片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircledWord {
    pub marker: u32,
    pub text: String,
}

/// 提取圈号片段并按圈号数值排序
///
/// 每个圈号之后到下一个圈号（或结尾）之间的文字归属该圈号，
/// 去掉括号注释和“N番目”及其之后的内容，空片段丢弃。
pub fn parse_circled_word_list(text: &str) -> Vec<CircledWord> {
    let markers: Vec<(usize, usize, u32)> = text
        .char_indices()
        .filter_map(|(i, c)| circled_value(c).map(|v| (i, i + c.len_utf8(), v)))
        .collect();

    let mut words: Vec<CircledWord> = markers
        .iter()
        .enumerate()
        .filter_map(|(n, &(_, start, marker))| {
            let end = markers.get(n + 1).map_or(text.len(), |&(next, _, _)| next);
            let fragment = clean_fragment(&text[start..end]);
            (!fragment.is_empty()).then_some(CircledWord {
                marker,
                text: fragment,
            })
        })
        .collect();

    words.sort_by_key(|w| w.marker);
    words
}

fn clean_fragment(raw: &str) -> String {
    let without_parens = PAREN_RE.replace_all(raw, " ");
    let cut = match ORDINAL_RE.find(&without_parens) {
        Some(m) => &without_parens[..m.start()],
        None => &without_parens[..],
    };
    normalize_whitespace(cut)
        .trim_matches(|c: char| matches!(c, ',' | '，' | '、' | '/' | '／'))
        .trim()
        .to_string()
}

/// 找出文字中所有“N番目”的 N，升序去重
pub fn detect_blank_indices(text: &str) -> Vec<u32> {
    let mut indices: Vec<u32> = ORDINAL_RE
        .captures_iter(text)
        .filter_map(|caps| to_ascii_digits(&caps[1]).parse().ok())
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

fn to_ascii_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// 大题的考查位置：先看提示文字，没有时扫描所有题目
pub fn section_blank_indices(hint: &str, questions: &[&Element]) -> Vec<u32> {
    let local = detect_blank_indices(hint);
    if !local.is_empty() {
        return local;
    }
    let all = questions
        .iter()
        .map(|q| q.text_content())
        .collect::<Vec<_>>()
        .join(" ");
    detect_blank_indices(&all)
}

/// 解析一道排序题
///
/// 不符合组合形式的选项被丢弃，答案下标按保留下来的选项重新计算。
pub fn parse_word_order_question(
    question: &Element,
    diag: &mut Diagnostics,
) -> JapaneseTranslateWordOrderCombination {
    let sentence = match question.first_child_named("body") {
        Some(body) => element_chunks(body),
        None => element_chunks_without(question, &["choices"]),
    };
    let words = parse_circled_word_list(&question_body_text(question))
        .into_iter()
        .map(|w| Chunk::English { text: w.text })
        .collect();

    let mut choices = Vec::new();
    let mut answer = AnswerIndex::UNKNOWN;
    for el in choice_elements(choices_of(question)) {
        let text = normalize_whitespace(&el.text_content());
        match parse_pair_choice_text(&text) {
            Some((first, second)) => {
                if answer.0.is_none() && is_marked_answer(el.attr("answer")) {
                    answer = AnswerIndex(Some(choices.len()));
                }
                choices.push(Choice::MultipleNumber {
                    choices: vec![first, second],
                });
            }
            None => diag.report(
                DiagnosticKind::UnmatchedPairChoice,
                format!("排序题选项 {:?} 不是编号组合，已丢弃", text),
            ),
        }
    }
    if !answer.is_known() {
        diag.missing_answer(&question_body_text(question));
    }

    JapaneseTranslateWordOrderCombination {
        sentence,
        words,
        choices,
        answer_index: answer,
    }
}
