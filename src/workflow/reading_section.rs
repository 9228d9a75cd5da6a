//! 阅读大题解析 - 流程层
//!
//! 核心职责：把一个 `reading_sections > section` 拆成若干阅读大题
//!
//! 处理顺序：
//! 1. 建立材料表（显式 `index` 优先，缺失时按出现位置编号）
//! 2. 按文档顺序把题目分配给材料
//! 3. 整组都是排序题的材料 → 排序组合大题
//! 4. 其余材料 → 单篇或多篇阅读
//! 5. 没有归属的题目 → 短句填空或排序组合

use crate::markup::Element;
use crate::models::{DiagnosticKind, ReadContentPart, ReadingSection};
use crate::services::content_parser::parse_content;
use crate::services::diagnostics::Diagnostics;
use crate::services::normalize_whitespace;
use crate::services::word_order::{
    is_word_order_question, parse_word_order_question, section_blank_indices,
};
use crate::utils::logging::truncate_text;
use crate::workflow::question_parser::{parse_content_question, parse_short_sentence_cloze};

/// 材料在材料表中的键
#[derive(Debug, Clone, PartialEq, Eq)]
enum ContentKey {
    /// 显式 `index` 属性
    Index(String),
    /// 没有 `index` 时的出现位置（从 0 开始）
    Position(usize),
}

/// 本大题的材料表，保持文档顺序
struct ContentTable<'a> {
    entries: Vec<(ContentKey, &'a Element)>,
}

impl<'a> ContentTable<'a> {
    /// 重复的 `index` 只保留第一次出现的材料，其余的记一条警告
    fn build(contents: &[&'a Element], diag: &mut Diagnostics) -> Self {
        let mut entries: Vec<(ContentKey, &'a Element)> = Vec::new();
        for (position, el) in contents.iter().enumerate() {
            let key = match el.attr_trimmed("index") {
                Some(index) => ContentKey::Index(index.to_string()),
                None => ContentKey::Position(position),
            };
            if entries.iter().any(|(existing, _)| *existing == key) {
                let preview = normalize_whitespace(&el.text_content());
                diag.report(
                    DiagnosticKind::DuplicateContentIndex,
                    format!(
                        "材料 index=\"{}\" 重复，已舍弃: {}",
                        el.attr_trimmed("index").unwrap_or_default(),
                        truncate_text(&preview, 40)
                    ),
                );
                continue;
            }
            entries.push((key, el));
        }
        Self { entries }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn element(&self, slot: usize) -> &'a Element {
        self.entries[slot].1
    }

    fn find_index(&self, index: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(key, _)| matches!(key, ContentKey::Index(i) if i == index))
    }

    /// 材料元素所在的槽位
    fn slot_of(&self, el: &Element) -> Option<usize> {
        match el.attr_trimmed("index") {
            Some(index) => self.find_index(index),
            None => self
                .entries
                .iter()
                .position(|(_, candidate)| std::ptr::eq(*candidate, el)),
        }
    }

    /// 解析题目的 `for`：先按 `index` 原样匹配，再按从 1 开始的序号
    fn resolve_for(&self, target: &str) -> Option<usize> {
        self.find_index(target).or_else(|| {
            target
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=self.len()).contains(n))
                .map(|n| n - 1)
        })
    }
}

/// 题目分配结果
struct Assignment<'a> {
    /// 与材料表槽位一一对应
    groups: Vec<Vec<&'a Element>>,
    orphans: Vec<&'a Element>,
}

/// 按文档顺序分配题目
///
/// 遇到材料时更新"当前材料"；题目有可解析的 `for` 时归到对应材料，
/// 否则归到当前材料，两者都没有时成为孤立题目。
fn assign_questions<'a>(section: &'a Element, table: &ContentTable<'a>) -> Assignment<'a> {
    let initial = (None::<usize>, vec![Vec::new(); table.len()], Vec::new());

    let (_, groups, orphans) =
        section
            .child_elements()
            .fold(initial, |(current, mut groups, mut orphans), el| {
                if el.is("content") {
                    (table.slot_of(el).or(current), groups, orphans)
                } else if el.is("question") {
                    let slot = el
                        .attr_trimmed("for")
                        .and_then(|target| table.resolve_for(target))
                        .or(current);
                    match slot {
                        Some(slot) => groups[slot].push(el),
                        None => orphans.push(el),
                    }
                    (current, groups, orphans)
                } else {
                    (current, groups, orphans)
                }
            });

    Assignment { groups, orphans }
}

/// 大题说明文字（材料和题目以外的文本），用于识别排序题的空栏编号
fn section_hint(section: &Element) -> String {
    section.text_content_without(&["content", "question"])
}

/// 排序组合大题
///
/// # 参数
/// - `hint`: 提示文字，优先从中找“N番目”
/// - `questions`: 本大题的题目
/// - `siblings`: 提示文字中没有“N番目”时扫描的题目（整个 section 的题目）
fn word_order_section(
    hint: &str,
    questions: &[&Element],
    siblings: &[&Element],
    diag: &mut Diagnostics,
) -> ReadingSection {
    let blank_indices = section_blank_indices(hint, siblings);
    let questions = questions
        .iter()
        .map(|q| parse_word_order_question(q, diag))
        .collect();
    ReadingSection::WordOrder {
        blank_indices,
        questions,
    }
}

/// 没有材料的题目：全部是排序题时为排序组合，否则为短句填空
fn standalone_section(
    hint: &str,
    questions: &[&Element],
    siblings: &[&Element],
    diag: &mut Diagnostics,
) -> Option<ReadingSection> {
    if questions.is_empty() {
        return None;
    }
    if questions.iter().all(|q| is_word_order_question(q)) {
        return Some(word_order_section(hint, questions, siblings, diag));
    }
    let questions = questions
        .iter()
        .map(|q| parse_short_sentence_cloze(q, diag))
        .collect();
    Some(ReadingSection::ShortSentenceCloze { questions })
}

/// 解析一个阅读 section
///
/// # 参数
/// - `section`: `reading_sections` 下的一个 `section` 元素
/// - `diag`: 当前文件的警告收集器
///
/// # 返回
/// 按"排序组合 → 阅读理解 → 孤立题目"的顺序返回大题
pub fn parse_reading_section(section: &Element, diag: &mut Diagnostics) -> Vec<ReadingSection> {
    let hint = section_hint(section);
    let contents: Vec<&Element> = section.children_named("content").collect();
    let all_questions: Vec<&Element> = section.children_named("question").collect();

    if contents.is_empty() {
        return standalone_section(&hint, &all_questions, &all_questions, diag)
            .into_iter()
            .collect();
    }

    let table = ContentTable::build(&contents, diag);
    let assignment = assign_questions(section, &table);

    let mut sections = Vec::new();
    let mut parts = Vec::new();

    for (slot, group) in assignment.groups.iter().enumerate() {
        let content_el = table.element(slot);

        if group.is_empty() {
            let preview = normalize_whitespace(&content_el.text_content());
            diag.report(
                DiagnosticKind::ContentWithoutQuestions,
                format!("材料没有对应的题目，已跳过: {}", truncate_text(&preview, 40)),
            );
            continue;
        }

        // ========== 排序组合：材料本身只是提示 ==========
        if group.iter().all(|q| is_word_order_question(q)) {
            let hint = format!("{} {}", hint, content_el.text_content());
            sections.push(word_order_section(&hint, group, &all_questions, diag));
            continue;
        }

        // ========== 阅读理解 ==========
        let content = parse_content(content_el, diag);
        let questions = group
            .iter()
            .map(|q| parse_content_question(q, diag))
            .collect();
        parts.push(ReadContentPart { content, questions });
    }

    match parts.len() {
        0 => {}
        1 => {
            let part = parts.remove(0);
            sections.push(ReadingSection::ReadContentAndAnswer {
                content: part.content,
                questions: part.questions,
            });
        }
        _ => sections.push(ReadingSection::MultipleReadContentAndAnswer { parts }),
    }

    if let Some(section) = standalone_section(&hint, &assignment.orphans, &all_questions, diag) {
        sections.push(section);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;
    use crate::models::{AnswerIndex, Choice, Content, ContentQuestion};

    fn parse(markup: &str) -> (Vec<ReadingSection>, Diagnostics) {
        let doc = parse_markup(markup);
        let section = doc.first_child_named("section").unwrap();
        let mut diag = Diagnostics::new("test");
        let sections = parse_reading_section(section, &mut diag);
        (sections, diag)
    }

    #[test]
    fn test_questions_follow_current_content() {
        let (sections, diag) = parse(
            r#"<section>
                <content index="1" type="email">First mail.</content>
                <question><body>Q1?</body><choices><choice answer>a</choice></choices></question>
                <question><body>Q2?</body><choices><choice answer>a</choice></choices></question>
                <content index="2" type="passage">Second text.</content>
                <question><body>Q3?</body><choices><choice answer>a</choice></choices></question>
                <question><body>Q4?</body><choices><choice answer>a</choice></choices></question>
            </section>"#,
        );
        assert!(diag.is_empty());
        assert_eq!(sections.len(), 1);
        match &sections[0] {
            ReadingSection::MultipleReadContentAndAnswer { parts } => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(parts[0].content, Content::Email { .. }));
                assert_eq!(parts[0].questions.len(), 2);
                assert_eq!(parts[1].questions.len(), 2);
            }
            other => panic!("应当是多篇阅读: {:?}", other),
        }
    }

    #[test]
    fn test_for_attribute_overrides_document_order() {
        let (sections, _) = parse(
            r#"<section>
                <content index="a">Text A.</content>
                <content index="b">Text B.</content>
                <question for="a"><body>About A?</body><choices><choice answer>x</choice></choices></question>
                <question><body>About B?</body><choices><choice answer>x</choice></choices></question>
            </section>"#,
        );
        match &sections[0] {
            ReadingSection::MultipleReadContentAndAnswer { parts } => {
                assert_eq!(parts[0].questions.len(), 1);
                assert_eq!(parts[1].questions.len(), 1);
            }
            other => panic!("应当是多篇阅读: {:?}", other),
        }
    }

    #[test]
    fn test_single_content_with_completion() {
        let (sections, _) = parse(
            r#"<section>
                <content type="passage">He lives in <blank id="1"/>.</content>
                <question><body><blank id="1"/></body>
                  <choices><choice>Osaka</choice><choice answer="true">Tokyo</choice></choices></question>
            </section>"#,
        );
        match &sections[0] {
            ReadingSection::ReadContentAndAnswer { questions, .. } => match &questions[0] {
                ContentQuestion::SentenceCompletion(q) => {
                    assert_eq!(q.answer_index, AnswerIndex(Some(1)));
                    assert_eq!(q.blank_for.as_deref(), Some("1"));
                }
                other => panic!("应当是填空: {:?}", other),
            },
            other => panic!("应当是单篇阅读: {:?}", other),
        }
    }

    #[test]
    fn test_questions_without_content_become_cloze() {
        let (sections, diag) = parse(
            r#"<section>
                <question><body>He ( ) tired.</body><choices><choice>be</choice><choice answer>is</choice></choices></question>
                <question><body>They ( ) here.</body><choices><choice answer>are</choice></choices></question>
            </section>"#,
        );
        assert!(diag.is_empty());
        match &sections[0] {
            ReadingSection::ShortSentenceCloze { questions } => assert_eq!(questions.len(), 2),
            other => panic!("应当是短句填空: {:?}", other),
        }
    }

    #[test]
    fn test_word_order_section_from_orphans() {
        let (sections, _) = parse(
            r#"<section>2番目と4番目に来るものを選びなさい。
                <question><body>彼は本を読む。 ①reads ②he ③a book</body>
                  <choices><choice>①-②</choice><choice answer>②-①</choice></choices></question>
            </section>"#,
        );
        match &sections[0] {
            ReadingSection::WordOrder {
                blank_indices,
                questions,
            } => {
                assert_eq!(blank_indices, &vec![2, 4]);
                assert_eq!(questions[0].answer_index, AnswerIndex(Some(1)));
                assert_eq!(
                    questions[0].choices[1],
                    Choice::MultipleNumber { choices: vec![2, 1] }
                );
            }
            other => panic!("应当是排序组合: {:?}", other),
        }
    }

    #[test]
    fn test_content_without_questions_is_reported() {
        let (sections, diag) = parse(
            r#"<section>
                <content index="1">Lonely text.</content>
                <content index="2">Second.</content>
                <question for="2"><body>Q?</body><choices><choice answer>a</choice></choices></question>
            </section>"#,
        );
        assert_eq!(diag.count(DiagnosticKind::ContentWithoutQuestions), 1);
        assert!(matches!(
            sections[0],
            ReadingSection::ReadContentAndAnswer { .. }
        ));
    }

    #[test]
    fn test_questions_before_any_content_are_orphans() {
        let (sections, _) = parse(
            r#"<section>
                <question><body>Early?</body><choices><choice answer>a</choice></choices></question>
                <content>Text.</content>
                <question><body>Late?</body><choices><choice answer>a</choice></choices></question>
            </section>"#,
        );
        assert_eq!(sections.len(), 2);
        assert!(matches!(sections[0], ReadingSection::ReadContentAndAnswer { .. }));
        assert!(matches!(sections[1], ReadingSection::ShortSentenceCloze { .. }));
    }

    #[test]
    fn test_word_order_group_comes_before_reading() {
        let (sections, diag) = parse(
            r#"<section>
                <content index="1">並べかえの例題です。</content>
                <question for="1"><body>彼は走る。 ①runs ②he</body>
                  <choices><choice answer>②-①</choice><choice>①-②</choice></choices></question>
                <content index="2" type="passage">Ken likes soccer.</content>
                <question for="2"><body>What does Ken like?</body>
                  <choices><choice answer>Soccer</choice><choice>Tennis</choice></choices></question>
            </section>"#,
        );
        assert!(diag.is_empty());
        assert_eq!(sections.len(), 2);
        match &sections[0] {
            ReadingSection::WordOrder { questions, .. } => {
                assert_eq!(questions.len(), 1);
                assert_eq!(questions[0].answer_index, AnswerIndex(Some(0)));
            }
            other => panic!("应当先输出排序组合: {:?}", other),
        }
        match &sections[1] {
            ReadingSection::ReadContentAndAnswer { content, questions } => {
                assert!(matches!(content, Content::Passage { .. }));
                assert_eq!(questions.len(), 1);
            }
            other => panic!("应当是单篇阅读: {:?}", other),
        }
    }

    #[test]
    fn test_for_matches_index_before_ordinal() {
        let (sections, _) = parse(
            r#"<section>
                <content index="2">Text two.</content>
                <content index="1">Text one.</content>
                <question for="1"><body>About one?</body><choices><choice answer>x</choice></choices></question>
                <question for="2"><body>About two?</body><choices><choice answer>x</choice></choices></question>
                <question for="1"><body>One again?</body><choices><choice answer>x</choice></choices></question>
            </section>"#,
        );
        match &sections[0] {
            ReadingSection::MultipleReadContentAndAnswer { parts } => {
                assert_eq!(parts.len(), 2);
                assert_eq!(parts[0].questions.len(), 1);
                assert_eq!(parts[1].questions.len(), 2);
            }
            other => panic!("应当是多篇阅读: {:?}", other),
        }
    }

    #[test]
    fn test_blank_indices_fall_back_to_every_question() {
        let (sections, _) = parse(
            r#"<section>
                <question><body>彼は本を読む。 ①reads ②he ③a book</body>
                  <choices><choice>①-②</choice><choice answer>②-①</choice></choices></question>
                <content index="1">Short text.</content>
                <question for="1"><body>Which is 2番目?</body><choices><choice answer>x</choice></choices></question>
            </section>"#,
        );
        assert_eq!(sections.len(), 2);
        match &sections[1] {
            ReadingSection::WordOrder { blank_indices, .. } => {
                assert_eq!(blank_indices, &vec![2]);
            }
            other => panic!("孤立的排序题应当是排序组合: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_content_index_is_reported() {
        let (sections, diag) = parse(
            r#"<section>
                <content index="1">First.</content>
                <content index="1">Second with the same index.</content>
                <question for="1"><body>Q?</body><choices><choice answer>a</choice></choices></question>
            </section>"#,
        );
        assert_eq!(diag.count(DiagnosticKind::DuplicateContentIndex), 1);
        assert_eq!(diag.len(), 1);
        assert!(matches!(sections[0], ReadingSection::ReadContentAndAnswer { .. }));
    }
}
