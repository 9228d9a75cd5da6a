//! 把文本块序列还原为纯文本 - 业务能力层

use crate::models::{Choice, Chunk, Content, ContentQuestion, Conversation, Sentence};
use crate::services::text_classifier::normalize_whitespace;

/// 空栏占位符：`[id]`，没有 id 时为 `[]`
pub fn blank_placeholder(id: Option<&str>) -> String {
    format!("[{}]", id.unwrap_or(""))
}

pub fn flatten_text(chunks: &[Chunk]) -> String {
    let parts: Vec<String> = chunks
        .iter()
        .map(|chunk| match chunk {
            Chunk::Blank { id } => blank_placeholder(id.as_deref()),
            Chunk::Japanese { text } | Chunk::English { text } => text.clone(),
        })
        .collect();
    normalize_whitespace(&parts.join(" "))
}

/// 每行渲染为 `speaker: text`
pub fn flatten_conversation(conversation: &Conversation) -> String {
    let lines: Vec<String> = conversation
        .iter()
        .map(|line| {
            let text = flatten_text(&line.text);
            if line.speaker.is_empty() {
                text
            } else {
                format!("{}: {}", line.speaker, text)
            }
        })
        .collect();
    normalize_whitespace(&lines.join(" "))
}

pub fn flatten_sentence(sentence: &Sentence) -> String {
    match sentence {
        Sentence::Text(chunks) => flatten_text(chunks),
        Sentence::Conversation(lines) => flatten_conversation(lines),
    }
}

/// 选项的纯文本，编号组合渲染为 `3-1`
pub fn choice_text(choice: &Choice) -> String {
    match choice {
        Choice::EnglishPhrase { choice } => flatten_text(choice),
        Choice::MultipleNumber { choices } => choices
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("-"),
    }
}

/// 用各题的正确选项填回材料中的空栏
///
/// 空栏优先匹配 `blankFor` 等于其 id 的题目，其余空栏按顺序
/// 取下一道没有 `blankFor` 的题。无法确定答案时保留占位符。
pub fn flatten_with_answers(content: &Content, questions: &[ContentQuestion]) -> String {
    let chunks = match content {
        Content::Conversation { conversation, .. } => return flatten_conversation(conversation),
        _ => content.text().map(Vec::as_slice).unwrap_or_default(),
    };

    let answers: Vec<(Option<&str>, Option<String>)> = questions
        .iter()
        .map(|q| {
            let answer = q
                .answer_index()
                .0
                .and_then(|i| q.choices().get(i))
                .map(choice_text);
            (q.blank_for(), answer)
        })
        .collect();
    let mut used = vec![false; answers.len()];

    let parts: Vec<String> = chunks
        .iter()
        .map(|chunk| match chunk {
            Chunk::Japanese { text } | Chunk::English { text } => text.clone(),
            Chunk::Blank { id } => {
                let by_id = id.as_deref().and_then(|id| {
                    (0..answers.len()).find(|&k| !used[k] && answers[k].0 == Some(id))
                });
                let slot = by_id.or_else(|| {
                    (0..answers.len()).find(|&k| !used[k] && answers[k].0.is_none())
                });
                match slot {
                    Some(k) => {
                        used[k] = true;
                        answers[k]
                            .1
                            .clone()
                            .unwrap_or_else(|| blank_placeholder(id.as_deref()))
                    }
                    None => blank_placeholder(id.as_deref()),
                }
            }
        })
        .collect();

    normalize_whitespace(&parts.join(" "))
}
