//! 选项与答案提取 - 业务能力层

use crate::markup::Element;
use crate::models::{AnswerIndex, Choice};
use crate::services::chunk_builder::element_chunks;
use crate::services::text_classifier::normalize_whitespace;

/// `answer` 属性被视为“正确答案”的取值（去空白、小写后比较）
static ANSWER_MARKERS: phf::Set<&'static str> = phf::phf_set! {
    "",
    "true",
    "1",
    "yes",
};

/// 可以充当选项的子元素名
const CHOICE_TAGS: [&str; 2] = ["choice", "option"];

/// `choices` 节点下的选项元素，按文档顺序
pub fn choice_elements(choices: Option<&Element>) -> Vec<&Element> {
    choices
        .map(|el| {
            el.child_elements()
                .filter(|c| CHOICE_TAGS.contains(&c.name.as_str()))
                .collect()
        })
        .unwrap_or_default()
}

/// 题目的 `choices` 子元素
pub fn choices_of(question: &Element) -> Option<&Element> {
    question.first_child_named("choices")
}

pub fn is_marked_answer(value: Option<&str>) -> bool {
    value.is_some_and(|v| ANSWER_MARKERS.contains(v.trim().to_lowercase().as_str()))
}

/// 全部选项转换为英文短语选项
pub fn phrase_choices(choices: Option<&Element>) -> Vec<Choice> {
    choice_elements(choices)
        .into_iter()
        .map(|el| Choice::EnglishPhrase {
            choice: element_chunks(el),
        })
        .collect()
}

/// 每个选项的纯文本
pub fn choice_texts(choices: Option<&Element>) -> Vec<String> {
    choice_elements(choices)
        .into_iter()
        .map(|el| normalize_whitespace(&el.text_content()))
        .collect()
}

/// 所有标记为正确的下标（多选题用）
pub fn answer_indices(choices: Option<&Element>) -> Vec<usize> {
    choice_elements(choices)
        .into_iter()
        .enumerate()
        .filter(|(_, el)| is_marked_answer(el.attr("answer")))
        .map(|(i, _)| i)
        .collect()
}

/// 第一个标记为正确的下标，没有时为未知
pub fn answer_index(choices: Option<&Element>) -> AnswerIndex {
    AnswerIndex(answer_indices(choices).first().copied())
}

/// 正确选项上的 `blankFor` 属性
pub fn marked_blank_for(choices: Option<&Element>) -> Option<String> {
    choice_elements(choices)
        .into_iter()
        .find(|el| is_marked_answer(el.attr("answer")))
        .and_then(|el| el.attr_trimmed("blankfor"))
        .map(str::to_string)
}
