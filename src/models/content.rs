use crate::models::chunk::{Conversation, Text};
use serde::{Deserialize, Serialize};

/// 阅读材料，按呈现形式区分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "EmailContent")]
    Email {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        text: Text,
    },
    #[serde(rename = "PosterContent")]
    Poster {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        text: Text,
    },
    #[serde(rename = "SentenceContent")]
    Sentence {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        text: Text,
    },
    #[serde(rename = "PassageContent")]
    Passage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        text: Text,
    },
    #[serde(rename = "ConversationContent")]
    Conversation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        conversation: Conversation,
    },
}

/// 材料种类（由 `type` 属性决定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Email,
    Poster,
    Sentence,
    Passage,
    Conversation,
    Script,
}

impl Content {
    pub fn title(&self) -> Option<&str> {
        match self {
            Content::Email { title, .. }
            | Content::Poster { title, .. }
            | Content::Sentence { title, .. }
            | Content::Passage { title, .. }
            | Content::Conversation { title, .. } => title.as_deref(),
        }
    }

    /// 非对话材料的正文
    pub fn text(&self) -> Option<&Text> {
        match self {
            Content::Email { text, .. }
            | Content::Poster { text, .. }
            | Content::Sentence { text, .. }
            | Content::Passage { text, .. } => Some(text),
            Content::Conversation { .. } => None,
        }
    }
}
