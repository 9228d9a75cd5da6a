use serde::{Deserialize, Serialize};

/// 文本的最小分类单元：日文、英文或空栏
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Chunk {
    #[serde(rename = "JapaneseChunk")]
    Japanese { text: String },
    #[serde(rename = "EnglishChunk")]
    English { text: String },
    #[serde(rename = "BlankChunk")]
    Blank {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

impl Chunk {
    pub fn english(text: impl Into<String>) -> Self {
        Chunk::English { text: text.into() }
    }

    pub fn japanese(text: impl Into<String>) -> Self {
        Chunk::Japanese { text: text.into() }
    }

    pub fn blank(id: Option<&str>) -> Self {
        Chunk::Blank {
            id: id.map(str::to_string),
        }
    }

    /// 文本块的内容，空栏返回 `None`
    pub fn text(&self) -> Option<&str> {
        match self {
            Chunk::Japanese { text } | Chunk::English { text } => Some(text),
            Chunk::Blank { .. } => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Chunk::Blank { .. })
    }

    pub fn blank_id(&self) -> Option<&str> {
        match self {
            Chunk::Blank { id } => id.as_deref(),
            _ => None,
        }
    }
}

/// 混合日文/英文/空栏的一段文字
pub type Text = Vec<Chunk>;

/// 对话中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLine {
    pub speaker: String,
    pub text: Text,
}

pub type Conversation = Vec<ConversationLine>;

/// 题干：普通文字或对话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sentence {
    Text(Text),
    Conversation(Conversation),
}
