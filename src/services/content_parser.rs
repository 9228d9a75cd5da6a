//! 材料与对话解析 - 业务能力层

use crate::markup::Element;
use crate::models::{Content, ContentKind, Conversation, ConversationLine, DiagnosticKind};
use crate::services::chunk_builder::{element_chunks, element_chunks_without};
use crate::services::diagnostics::Diagnostics;
use crate::services::text_classifier::normalize_whitespace;

/// `content[type]` 的取值与材料种类
static CONTENT_KINDS: phf::Map<&'static str, ContentKind> = phf::phf_map! {
    "email" => ContentKind::Email,
    "e-mail" => ContentKind::Email,
    "poster" => ContentKind::Poster,
    "notice" => ContentKind::Poster,
    "sentence" => ContentKind::Sentence,
    "paragraph" => ContentKind::Passage,
    "passage" => ContentKind::Passage,
    "conversation" => ContentKind::Conversation,
    "script" => ContentKind::Script,
};

/// 材料的种类；未知或缺失时为 `None`
pub fn content_kind(el: &Element) -> Option<ContentKind> {
    el.type_attr()
        .and_then(|t| CONTENT_KINDS.get(t.as_str()).copied())
}

pub fn is_script(el: &Element) -> bool {
    content_kind(el) == Some(ContentKind::Script)
}

/// 材料标题：`title` 属性或 `title` 子元素
fn content_title(el: &Element) -> Option<String> {
    el.attr_trimmed("title")
        .map(str::to_string)
        .or_else(|| {
            el.first_child_named("title")
                .map(|t| normalize_whitespace(&t.text_content()))
        })
        .filter(|t| !t.is_empty())
}

/// 解析一篇阅读材料
///
/// 未知的 `type` 按 passage 处理并记录警告。
pub fn parse_content(el: &Element, diag: &mut Diagnostics) -> Content {
    let title = content_title(el);
    let kind = match content_kind(el) {
        Some(kind) => kind,
        None => {
            if let Some(raw) = el.type_attr() {
                diag.report(
                    DiagnosticKind::UnknownContentType,
                    format!("content type=\"{}\" 未识别，按 passage 处理", raw),
                );
            }
            ContentKind::Passage
        }
    };

    if kind == ContentKind::Conversation {
        if let Some(conversation) = parse_conversation(el) {
            return Content::Conversation {
                title,
                conversation,
            };
        }
    }

    let text = element_chunks_without(el, &["title", "question"]);
    match kind {
        ContentKind::Email => Content::Email { title, text },
        ContentKind::Poster => Content::Poster { title, text },
        ContentKind::Sentence => Content::Sentence { title, text },
        ContentKind::Passage | ContentKind::Conversation | ContentKind::Script => {
            Content::Passage { title, text }
        }
    }
}

/// 收集 `line[speaker]` 组成对话，没有 `line` 时为 `None`
pub fn parse_conversation(el: &Element) -> Option<Conversation> {
    let lines: Conversation = el
        .descendants_named("line")
        .into_iter()
        .map(|line| ConversationLine {
            speaker: line.attr_trimmed("speaker").unwrap_or_default().to_string(),
            text: element_chunks(line),
        })
        .collect();
    (!lines.is_empty()).then_some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;
    use crate::models::Chunk;

    fn parse(markup: &str) -> (Content, Diagnostics) {
        let doc = parse_markup(markup);
        let mut diag = Diagnostics::new("test");
        let content = parse_content(doc.first_child_named("content").unwrap(), &mut diag);
        (content, diag)
    }

    #[test]
    fn test_email_with_title_element() {
        let (content, diag) =
            parse(r#"<content type="Email"><title>Re: Party</title>Hi Tom, thanks.</content>"#);
        assert_eq!(
            content,
            Content::Email {
                title: Some("Re: Party".into()),
                text: vec![Chunk::english("Hi Tom, thanks.")],
            }
        );
        assert!(diag.is_empty());
    }

    #[test]
    fn test_unknown_type_falls_back_with_warning() {
        let (content, diag) = parse(r#"<content type="brochure">Visit us.</content>"#);
        assert!(matches!(content, Content::Passage { .. }));
        assert_eq!(diag.count(DiagnosticKind::UnknownContentType), 1);
    }

    #[test]
    fn test_missing_type_is_silent_passage() {
        let (content, diag) = parse("<content>Text.</content>");
        assert!(matches!(content, Content::Passage { .. }));
        assert!(diag.is_empty());
    }

    #[test]
    fn test_conversation_content() {
        let (content, _) = parse(
            r#"<content type="conversation"><line speaker="A">Hello.</line><line speaker="B">こんにちは。</line></content>"#,
        );
        match content {
            Content::Conversation { conversation, .. } => {
                assert_eq!(conversation.len(), 2);
                assert_eq!(conversation[1].text, vec![Chunk::japanese("こんにちは。")]);
            }
            other => panic!("应当是对话材料: {:?}", other),
        }
    }

    #[test]
    fn test_nested_questions_are_not_content_text() {
        let (content, _) = parse(
            r#"<content type="passage">Body.<question><body>Q?</body></question></content>"#,
        );
        assert_eq!(content.text().unwrap(), &vec![Chunk::english("Body.")]);
    }
}
