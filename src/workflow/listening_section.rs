//! 听力大题解析 - 流程层
//!
//! 核心职责：把一个 `listening_sections > section` 转换成听力大题
//!
//! - 含 `content[type=script]` → Real-Life 形式
//! - 任一题目带对话 → 听对话选应答（其余题目丢弃并警告）
//! - 否则 → 听英文句子选内容

use crate::markup::Element;
use crate::models::{
    ContentKind, Conversation, DiagnosticKind, ListeningSection, Reallife, ReallifePart,
    SelectResponseByConversation, SelectSentenceByEnglishSentence, Sentence, ShortSentenceCloze,
    Text,
};
use crate::services::choice_extractor::{answer_index, answer_indices, choices_of, phrase_choices};
use crate::services::chunk_builder::element_chunks_without;
use crate::services::content_parser::{content_kind, is_script, parse_conversation};
use crate::services::diagnostics::Diagnostics;
use crate::services::flatten::flatten_sentence;
use crate::services::text_classifier::{classify_text, normalize_whitespace};
use crate::services::word_order::question_body_text;
use crate::utils::logging::truncate_text;
use crate::workflow::question_parser::{body_chunks, parse_short_sentence_cloze};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// “（场景说明）首句。其余广播稿”
static SITUATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*[(（]([^)）]+)[)）]\s*([^.。!?？]+[.。!?？])\s*(.*)$")
        .expect("SITUATION_RE")
});

/// 听力单题的解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum ListeningQuestion {
    Conversation(SelectResponseByConversation),
    Cloze(ShortSentenceCloze),
    Sentence(SelectSentenceByEnglishSentence),
}

impl ListeningQuestion {
    pub fn is_conversation(&self) -> bool {
        matches!(self, ListeningQuestion::Conversation(_))
    }

    /// 统一为听英文句子选内容；填空题的句子拍平后重新分类
    pub fn into_sentence_question(self) -> Option<SelectSentenceByEnglishSentence> {
        match self {
            ListeningQuestion::Conversation(_) => None,
            ListeningQuestion::Cloze(cloze) => Some(SelectSentenceByEnglishSentence {
                sentence: classify_text(&flatten_sentence(&cloze.sentence)),
                choices: cloze.choices,
                answer_index: cloze.answer_index,
            }),
            ListeningQuestion::Sentence(q) => Some(q),
        }
    }
}

fn is_conversation_content(el: &Element) -> bool {
    content_kind(el) == Some(ContentKind::Conversation) || el.has_descendant("line")
}

/// 按 `index` 原样匹配，再按从 1 开始的序号
fn referenced_content<'a>(target: &str, contents: &[&'a Element]) -> Option<&'a Element> {
    contents
        .iter()
        .find(|c| c.attr_trimmed("index") == Some(target))
        .or_else(|| {
            target
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| contents.get(i))
        })
        .copied()
}

/// 题目的对话来源：自带对话材料 → 题目中的 `line` → `for` 指向的对话材料
fn conversation_source(question: &Element, contents: &[&Element]) -> Option<Conversation> {
    question
        .children_named("content")
        .find(|c| is_conversation_content(c))
        .and_then(parse_conversation)
        .or_else(|| parse_conversation(question.first_child_named("body").unwrap_or(question)))
        .or_else(|| {
            question
                .attr_trimmed("for")
                .and_then(|target| referenced_content(target, contents))
                .filter(|c| is_conversation_content(c))
                .and_then(parse_conversation)
        })
}

/// 对话题的提问部分（去掉对话行）
fn conversation_prompt(question: &Element) -> Text {
    match question.first_child_named("body") {
        Some(body) => element_chunks_without(body, &["line"]),
        None => element_chunks_without(question, &["choices", "content", "line"]),
    }
}

/// 解析一道听力题
///
/// # 参数
/// - `question`: 题目元素
/// - `contents`: 同一 section 下的材料，供 `for` 引用
/// - `diag`: 当前文件的警告收集器
pub fn parse_listening_question(
    question: &Element,
    contents: &[&Element],
    diag: &mut Diagnostics,
) -> ListeningQuestion {
    if let Some(conversation) = conversation_source(question, contents) {
        let choices = choices_of(question);
        let answer = answer_index(choices);
        if !answer.is_known() {
            diag.missing_answer(&question_body_text(question));
        }
        return ListeningQuestion::Conversation(SelectResponseByConversation {
            conversation,
            question: conversation_prompt(question),
            choices: phrase_choices(choices),
            answer_index: answer,
        });
    }

    match question.type_attr().as_deref() {
        Some("fill") | Some("completion") => {
            ListeningQuestion::Cloze(parse_short_sentence_cloze(question, diag))
        }
        _ => {
            let choices = choices_of(question);
            let answer = answer_index(choices);
            if !answer.is_known() {
                diag.missing_answer(&question_body_text(question));
            }
            ListeningQuestion::Sentence(SelectSentenceByEnglishSentence {
                sentence: body_chunks(question),
                choices: phrase_choices(choices),
                answer_index: answer,
            })
        }
    }
}

/// 拆分广播稿开头的场景说明
///
/// 匹配“（场景）首句。其余”时，场景为括号内文字，广播稿为首句加其余部分；
/// 不匹配时场景为空，全文作为广播稿。
pub fn split_situation(text: &str) -> (Text, Text) {
    match SITUATION_RE.captures(text) {
        Some(caps) => {
            let script = format!("{} {}", &caps[2], &caps[3]);
            (classify_text(&caps[1]), classify_text(&script))
        }
        None => (Vec::new(), classify_text(text)),
    }
}

fn parse_reallife_part(question: &Element, diag: &mut Diagnostics) -> ReallifePart {
    let choices = choices_of(question);
    let answer_indices = answer_indices(choices);
    if answer_indices.is_empty() {
        diag.missing_answer(&question_body_text(question));
    }
    ReallifePart {
        question: body_chunks(question),
        choices: phrase_choices(choices),
        answer_indices,
    }
}

/// Real-Life 形式：每篇广播稿一题
///
/// 小题来自广播稿内部的 `question`，以及 `for` 等于广播稿 `index` 的同级题目。
fn parse_reallife_section(
    section: &Element,
    scripts: &[&Element],
    diag: &mut Diagnostics,
) -> Vec<Reallife> {
    let siblings: Vec<&Element> = section.children_named("question").collect();
    let mut claimed = vec![false; siblings.len()];
    let mut result = Vec::with_capacity(scripts.len());

    for script in scripts {
        let mut parts: Vec<ReallifePart> = script
            .children_named("question")
            .map(|q| parse_reallife_part(q, diag))
            .collect();

        if let Some(key) = script.attr_trimmed("index") {
            for (i, question) in siblings.iter().enumerate() {
                if !claimed[i] && question.attr_trimmed("for") == Some(key) {
                    claimed[i] = true;
                    parts.push(parse_reallife_part(question, diag));
                }
            }
        }

        let (situation, script_text) =
            split_situation(&element_text(script, &["question", "title"]));
        result.push(Reallife {
            situation,
            script: script_text,
            parts,
        });
    }

    for (question, _) in siblings.iter().zip(&claimed).filter(|(_, claimed)| !**claimed) {
        diag.report(
            DiagnosticKind::OrphanQuestion,
            format!(
                "听力题没有对应的广播稿，已丢弃: {}",
                truncate_text(&normalize_whitespace(&question_body_text(question)), 40)
            ),
        );
    }

    result
}

fn element_text(el: &Element, skip: &[&str]) -> String {
    normalize_whitespace(&el.text_content_without(skip))
}

/// 解析一个听力 section
///
/// # 参数
/// - `section`: `listening_sections` 下的一个 `section` 元素
/// - `diag`: 当前文件的警告收集器
///
/// # 返回
/// 没有题目时返回空列表，否则返回一个听力大题
pub fn parse_listening_section(
    section: &Element,
    diag: &mut Diagnostics,
) -> Vec<ListeningSection> {
    let contents: Vec<&Element> = section.children_named("content").collect();

    // ========== Real-Life 形式 ==========
    let scripts: Vec<&Element> = contents.iter().copied().filter(|c| is_script(c)).collect();
    if !scripts.is_empty() {
        let questions = parse_reallife_section(section, &scripts, diag);
        return vec![ListeningSection::Reallife { questions }];
    }

    let parsed: Vec<ListeningQuestion> = section
        .children_named("question")
        .map(|q| parse_listening_question(q, &contents, diag))
        .collect();
    if parsed.is_empty() {
        debug!("听力 section 没有题目");
        return Vec::new();
    }

    // ========== 听对话选应答 ==========
    if parsed.iter().any(ListeningQuestion::is_conversation) {
        let mut questions = Vec::new();
        for question in parsed {
            match question {
                ListeningQuestion::Conversation(q) => questions.push(q),
                other => diag.report(
                    DiagnosticKind::DroppedQuestion,
                    format!(
                        "对话大题中的非对话题已丢弃: {}",
                        truncate_text(&preview(&other), 40)
                    ),
                ),
            }
        }
        return vec![ListeningSection::SelectResponseByConversation { questions }];
    }

    // ========== 听英文句子选内容 ==========
    let questions = parsed
        .into_iter()
        .filter_map(ListeningQuestion::into_sentence_question)
        .collect();
    vec![ListeningSection::SelectSentenceByEnglishSentence { questions }]
}

fn preview(question: &ListeningQuestion) -> String {
    match question {
        ListeningQuestion::Conversation(q) => {
            flatten_sentence(&Sentence::Conversation(q.conversation.clone()))
        }
        ListeningQuestion::Cloze(q) => flatten_sentence(&q.sentence),
        ListeningQuestion::Sentence(q) => flatten_sentence(&Sentence::Text(q.sentence.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;
    use crate::models::{AnswerIndex, Chunk};

    fn parse(markup: &str) -> (Vec<ListeningSection>, Diagnostics) {
        let doc = parse_markup(markup);
        let section = doc.first_child_named("section").unwrap();
        let mut diag = Diagnostics::new("test");
        let sections = parse_listening_section(section, &mut diag);
        (sections, diag)
    }

    #[test]
    fn test_split_situation() {
        let (situation, script) = split_situation(
            "(You are at a station.) Attention, please. The train to Osaka is late.",
        );
        assert_eq!(situation, vec![Chunk::english("You are at a station.")]);
        assert_eq!(
            script,
            vec![Chunk::english("Attention, please. The train to Osaka is late.")]
        );

        let (situation, script) = split_situation("No situation here.");
        assert!(situation.is_empty());
        assert_eq!(script, vec![Chunk::english("No situation here.")]);
    }

    #[test]
    fn test_reallife_collects_inner_and_linked_questions() {
        let (sections, diag) = parse(
            r#"<section>
                <content type="script" index="s1">(You are at a mall.) Welcome to the mall. The sale ends today.
                  <question><body>When does the sale end?</body>
                    <choices><choice answer>Today</choice><choice>Tomorrow</choice></choices></question>
                </content>
                <question for="s1"><body>Where are you?</body>
                  <choices><choice>Home</choice><choice answer>Mall</choice></choices></question>
                <question for="zz"><body>Lost?</body><choices><choice answer>a</choice></choices></question>
            </section>"#,
        );
        assert_eq!(diag.count(DiagnosticKind::OrphanQuestion), 1);
        match &sections[0] {
            ListeningSection::Reallife { questions } => {
                assert_eq!(questions.len(), 1);
                assert_eq!(questions[0].situation, vec![Chunk::english("You are at a mall.")]);
                assert_eq!(questions[0].parts.len(), 2);
                assert_eq!(questions[0].parts[1].answer_indices, vec![1]);
            }
            other => panic!("应当是 Real-Life: {:?}", other),
        }
    }

    #[test]
    fn test_conversation_section_drops_plain_questions() {
        let (sections, diag) = parse(
            r#"<section>
                <question><content type="conversation"><line speaker="W">Is this seat free?</line></content>
                  <choices><choice answer>Yes, go ahead.</choice><choice>I'm fine.</choice></choices></question>
                <question><body>Plain sentence.</body><choices><choice answer>a</choice></choices></question>
            </section>"#,
        );
        assert_eq!(diag.count(DiagnosticKind::DroppedQuestion), 1);
        match &sections[0] {
            ListeningSection::SelectResponseByConversation { questions } => {
                assert_eq!(questions.len(), 1);
                assert_eq!(questions[0].conversation[0].speaker, "W");
                assert_eq!(questions[0].answer_index, AnswerIndex(Some(0)));
            }
            other => panic!("应当是对话大题: {:?}", other),
        }
    }

    #[test]
    fn test_for_reference_to_conversation_content() {
        let (sections, _) = parse(
            r#"<section>
                <content index="c1" type="conversation"><line speaker="M">Hi.</line></content>
                <question for="c1"><choices><choice answer>Hello.</choice></choices></question>
            </section>"#,
        );
        assert!(matches!(
            sections[0],
            ListeningSection::SelectResponseByConversation { .. }
        ));
    }

    #[test]
    fn test_cloze_is_normalized_to_sentence_question() {
        let (sections, _) = parse(
            r#"<section>
                <question type="fill"><body>I want <blank id="1"/> 東京</body>
                  <choices><choice answer>to go</choice></choices></question>
                <question><body>He likes dogs.</body><choices><choice answer>1</choice></choices></question>
            </section>"#,
        );
        match &sections[0] {
            ListeningSection::SelectSentenceByEnglishSentence { questions } => {
                assert_eq!(questions.len(), 2);
                assert_eq!(
                    questions[0].sentence,
                    vec![Chunk::japanese("I want [1] 東京")]
                );
                assert_eq!(questions[1].sentence, vec![Chunk::english("He likes dogs.")]);
            }
            other => panic!("应当是句子大题: {:?}", other),
        }
    }

    #[test]
    fn test_empty_section_yields_nothing() {
        let (sections, _) = parse("<section></section>");
        assert!(sections.is_empty());
    }
}
