use crate::models::chunk::{Chunk, Conversation, Sentence, Text};
use crate::models::choice::Choice;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 正确答案的下标
///
/// 找不到标记答案时为 `None`，序列化为 `-1`，下游不得把它当作有效下标使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnswerIndex(pub Option<usize>);

impl AnswerIndex {
    pub const UNKNOWN: AnswerIndex = AnswerIndex(None);

    pub fn is_known(self) -> bool {
        self.0.is_some()
    }
}

impl From<Option<usize>> for AnswerIndex {
    fn from(index: Option<usize>) -> Self {
        AnswerIndex(index)
    }
}

impl Serialize for AnswerIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(index) => serializer.serialize_i64(index as i64),
            None => serializer.serialize_i64(-1),
        }
    }
}

impl<'de> Deserialize<'de> for AnswerIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Ok(AnswerIndex(usize::try_from(raw).ok()))
    }
}

/// 短句填空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ShortSentenceCloze {
    pub sentence: Sentence,
    pub choices: Vec<Choice>,
    pub answer_index: AnswerIndex,
}

/// 日文翻译的排序组合题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct JapaneseTranslateWordOrderCombination {
    pub sentence: Text,
    /// 按圈号排好序的英文片段
    pub words: Vec<Chunk>,
    /// 只含 `MultipleNumberChoice`
    pub choices: Vec<Choice>,
    pub answer_index: AnswerIndex,
}

/// 长文填空（依附于某篇材料）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct SentenceCompletion {
    pub question: Text,
    pub choices: Vec<Choice>,
    pub answer_index: AnswerIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank_for: Option<String>,
}

/// 内容一致选择（依附于某篇材料）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct SelectTrueSentence {
    pub question: Text,
    pub choices: Vec<Choice>,
    pub answer_index: AnswerIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank_for: Option<String>,
}

/// 听对话选应答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct SelectResponseByConversation {
    pub conversation: Conversation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub question: Text,
    pub choices: Vec<Choice>,
    pub answer_index: AnswerIndex,
}

/// 听英文句子选内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct SelectSentenceByEnglishSentence {
    pub sentence: Text,
    pub choices: Vec<Choice>,
    pub answer_index: AnswerIndex,
}

/// Real-Life 形式的一个小题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReallifePart {
    pub question: Text,
    pub choices: Vec<Choice>,
    pub answer_indices: Vec<usize>,
}

/// Real-Life 形式（场景 + 广播稿 + 若干小题）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct Reallife {
    pub situation: Text,
    pub script: Text,
    pub parts: Vec<ReallifePart>,
}

/// 依附于阅读材料的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentQuestion {
    SentenceCompletion(SentenceCompletion),
    SelectTrueSentence(SelectTrueSentence),
}

impl ContentQuestion {
    pub fn choices(&self) -> &[Choice] {
        match self {
            ContentQuestion::SentenceCompletion(q) => &q.choices,
            ContentQuestion::SelectTrueSentence(q) => &q.choices,
        }
    }

    pub fn answer_index(&self) -> AnswerIndex {
        match self {
            ContentQuestion::SentenceCompletion(q) => q.answer_index,
            ContentQuestion::SelectTrueSentence(q) => q.answer_index,
        }
    }

    pub fn blank_for(&self) -> Option<&str> {
        match self {
            ContentQuestion::SentenceCompletion(q) => q.blank_for.as_deref(),
            ContentQuestion::SelectTrueSentence(q) => q.blank_for.as_deref(),
        }
    }
}

/// 所有题型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Question {
    ShortSentenceCloze(ShortSentenceCloze),
    JapaneseTranslateWordOrderCombination(JapaneseTranslateWordOrderCombination),
    SentenceCompletion(SentenceCompletion),
    SelectTrueSentence(SelectTrueSentence),
    SelectResponseByConversation(SelectResponseByConversation),
    SelectSentenceByEnglishSentence(SelectSentenceByEnglishSentence),
    Reallife(Reallife),
}

impl Question {
    /// 是否找到了标记答案
    pub fn has_known_answer(&self) -> bool {
        match self {
            Question::ShortSentenceCloze(q) => q.answer_index.is_known(),
            Question::JapaneseTranslateWordOrderCombination(q) => q.answer_index.is_known(),
            Question::SentenceCompletion(q) => q.answer_index.is_known(),
            Question::SelectTrueSentence(q) => q.answer_index.is_known(),
            Question::SelectResponseByConversation(q) => q.answer_index.is_known(),
            Question::SelectSentenceByEnglishSentence(q) => q.answer_index.is_known(),
            Question::Reallife(q) => q.parts.iter().all(|p| !p.answer_indices.is_empty()),
        }
    }
}

impl From<ContentQuestion> for Question {
    fn from(q: ContentQuestion) -> Self {
        match q {
            ContentQuestion::SentenceCompletion(q) => Question::SentenceCompletion(q),
            ContentQuestion::SelectTrueSentence(q) => Question::SelectTrueSentence(q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answer_index_sentinel() {
        assert_eq!(serde_json::to_value(AnswerIndex(Some(2))).unwrap(), json!(2));
        assert_eq!(serde_json::to_value(AnswerIndex::UNKNOWN).unwrap(), json!(-1));

        let parsed: AnswerIndex = serde_json::from_value(json!(-1)).unwrap();
        assert_eq!(parsed, AnswerIndex::UNKNOWN);
        let parsed: AnswerIndex = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(parsed, AnswerIndex(Some(3)));
    }

    #[test]
    fn test_question_struct_carries_type_tag() {
        let q = SelectSentenceByEnglishSentence {
            sentence: vec![Chunk::english("He is tired.")],
            choices: vec![],
            answer_index: AnswerIndex::UNKNOWN,
        };
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["type"], "SelectSentenceByEnglishSentence");
        assert_eq!(value["answerIndex"], -1);
    }

    #[test]
    fn test_reallife_answer_known_only_when_all_parts_marked() {
        let part = |answers: Vec<usize>| ReallifePart {
            question: vec![],
            choices: vec![],
            answer_indices: answers,
        };
        let q = Question::Reallife(Reallife {
            situation: vec![],
            script: vec![],
            parts: vec![part(vec![1]), part(vec![])],
        });
        assert!(!q.has_known_answer());
    }
}
