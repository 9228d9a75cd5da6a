//! 单题解析 - 流程层
//!
//! 阅读与听力共用的题目解析函数

use crate::markup::Element;
use crate::models::{
    ContentQuestion, Sentence, SelectTrueSentence, SentenceCompletion, ShortSentenceCloze, Text,
};
use crate::services::choice_extractor::{answer_index, choices_of, marked_blank_for, phrase_choices};
use crate::services::chunk_builder::{blank_id, element_chunks, element_chunks_without};
use crate::services::content_parser::parse_conversation;
use crate::services::diagnostics::Diagnostics;
use crate::services::word_order::question_body_text;

/// 题干以外的子元素
const NON_BODY_TAGS: [&str; 2] = ["choices", "content"];

/// 题干文本块：优先 `body`，否则为除选项和材料以外的全部内容
pub fn body_chunks(question: &Element) -> Text {
    match question.first_child_named("body") {
        Some(body) => element_chunks(body),
        None => element_chunks_without(question, &NON_BODY_TAGS),
    }
}

/// 短句填空；题干含 `line` 时为对话形式
pub fn parse_short_sentence_cloze(
    question: &Element,
    diag: &mut Diagnostics,
) -> ShortSentenceCloze {
    let body = question.first_child_named("body").unwrap_or(question);
    let sentence = match parse_conversation(body) {
        Some(lines) => Sentence::Conversation(lines),
        None => Sentence::Text(body_chunks(question)),
    };
    let choices = choices_of(question);
    let answer = answer_index(choices);
    if !answer.is_known() {
        diag.missing_answer(&question_body_text(question));
    }

    ShortSentenceCloze {
        sentence,
        choices: phrase_choices(choices),
        answer_index: answer,
    }
}

/// 题干含空栏，或显式标注 `type="completion"`
pub fn is_completion(question: &Element) -> bool {
    let has_blank = question.first_child_named("body").map_or_else(
        || {
            question
                .child_elements()
                .filter(|el| !el.is("choices"))
                .any(|el| el.is("blank") || el.has_descendant("blank"))
        },
        |body| body.has_descendant("blank"),
    );
    has_blank || question.type_attr().as_deref() == Some("completion")
}

/// 题目对应的空栏 id：题干空栏 → 正确选项的 `blankFor` → 题目的 `blank` 属性
fn blank_for(question: &Element) -> Option<String> {
    question
        .first_child_named("body")
        .and_then(|body| body.descendants_named("blank").first().and_then(|b| blank_id(b)))
        .or_else(|| marked_blank_for(choices_of(question)))
        .or_else(|| question.attr_trimmed("blank").map(str::to_string))
}

/// 依附于材料的题目：填空或内容一致
pub fn parse_content_question(question: &Element, diag: &mut Diagnostics) -> ContentQuestion {
    let choices = choices_of(question);
    let answer = answer_index(choices);
    if !answer.is_known() {
        diag.missing_answer(&question_body_text(question));
    }
    let body = body_chunks(question);
    let choices = phrase_choices(choices);
    let blank_for = blank_for(question);

    if is_completion(question) {
        ContentQuestion::SentenceCompletion(SentenceCompletion {
            question: body,
            choices,
            answer_index: answer,
            blank_for,
        })
    } else {
        ContentQuestion::SelectTrueSentence(SelectTrueSentence {
            question: body,
            choices,
            answer_index: answer,
            blank_for,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;
    use crate::models::{AnswerIndex, Chunk};

    fn question(markup: &str) -> Element {
        parse_markup(markup).first_child_named("question").unwrap().clone()
    }

    #[test]
    fn test_cloze_with_conversation_body() {
        let q = question(
            r#"<question><body><line speaker="A">Can I help you?</line><line speaker="B">Yes, <blank id="1"/>.</line></body>
            <choices><choice answer="true">please</choice><choice>sorry</choice></choices></question>"#,
        );
        let mut diag = Diagnostics::new("t");
        let cloze = parse_short_sentence_cloze(&q, &mut diag);
        match cloze.sentence {
            Sentence::Conversation(lines) => {
                assert_eq!(lines.len(), 2);
                assert_eq!(lines[1].text[1], Chunk::blank(Some("1")));
            }
            Sentence::Text(_) => panic!("应当是对话形式"),
        }
        assert_eq!(cloze.answer_index, AnswerIndex(Some(0)));
        assert!(diag.is_empty());
    }

    #[test]
    fn test_cloze_missing_answer_is_reported() {
        let q = question(
            "<question><body>He ( ) tired.</body><choices><choice>is</choice></choices></question>",
        );
        let mut diag = Diagnostics::new("t");
        let cloze = parse_short_sentence_cloze(&q, &mut diag);
        assert_eq!(cloze.answer_index, AnswerIndex::UNKNOWN);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_content_question_dispatch() {
        let mut diag = Diagnostics::new("t");
        let with_blank = question(
            r#"<question><body>It was <blank id="b"/>.</body><choices><choice answer>fun</choice></choices></question>"#,
        );
        match parse_content_question(&with_blank, &mut diag) {
            ContentQuestion::SentenceCompletion(q) => assert_eq!(q.blank_for.as_deref(), Some("b")),
            other => panic!("应当是填空: {:?}", other),
        }

        let typed = question(r#"<question type="Completion"><body>Why?</body></question>"#);
        assert!(matches!(
            parse_content_question(&typed, &mut diag),
            ContentQuestion::SentenceCompletion(_)
        ));

        let plain = question(
            r#"<question><body>What is true?</body><choices><choice answer="yes">A</choice></choices></question>"#,
        );
        assert!(matches!(
            parse_content_question(&plain, &mut diag),
            ContentQuestion::SelectTrueSentence(_)
        ));
    }
}
