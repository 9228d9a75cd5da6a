use crate::models::content::Content;
use crate::models::question::{
    ContentQuestion, JapaneseTranslateWordOrderCombination, Question, Reallife,
    SelectResponseByConversation, SelectSentenceByEnglishSentence, ShortSentenceCloze,
};
use serde::{Deserialize, Serialize};

/// 一篇材料与其题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadContentPart {
    pub content: Content,
    pub questions: Vec<ContentQuestion>,
}

/// 阅读大题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReadingSection {
    #[serde(rename = "ShortSentenceClozeSection")]
    ShortSentenceCloze { questions: Vec<ShortSentenceCloze> },
    #[serde(
        rename = "JapaneseTranslateWordOrderCombinationSection",
        rename_all = "camelCase"
    )]
    WordOrder {
        /// 本大题考查的位置（“N番目”中的 N），升序去重
        blank_indices: Vec<u32>,
        questions: Vec<JapaneseTranslateWordOrderCombination>,
    },
    #[serde(rename = "ReadContentAndAnswerSection")]
    ReadContentAndAnswer {
        content: Content,
        questions: Vec<ContentQuestion>,
    },
    #[serde(rename = "MultipleReadContentAndAnswerSection")]
    MultipleReadContentAndAnswer { parts: Vec<ReadContentPart> },
}

/// 听力大题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ListeningSection {
    #[serde(rename = "SelectResponseByConversationSection")]
    SelectResponseByConversation {
        questions: Vec<SelectResponseByConversation>,
    },
    #[serde(rename = "SelectSentenceByEnglishSentenceSection")]
    SelectSentenceByEnglishSentence {
        questions: Vec<SelectSentenceByEnglishSentence>,
    },
    #[serde(rename = "ReallifeSection")]
    Reallife { questions: Vec<Reallife> },
}

impl ReadingSection {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ReadingSection::ShortSentenceCloze { .. } => "ShortSentenceClozeSection",
            ReadingSection::WordOrder { .. } => "JapaneseTranslateWordOrderCombinationSection",
            ReadingSection::ReadContentAndAnswer { .. } => "ReadContentAndAnswerSection",
            ReadingSection::MultipleReadContentAndAnswer { .. } => {
                "MultipleReadContentAndAnswerSection"
            }
        }
    }

    pub fn questions(&self) -> Vec<Question> {
        match self {
            ReadingSection::ShortSentenceCloze { questions } => questions
                .iter()
                .cloned()
                .map(Question::ShortSentenceCloze)
                .collect(),
            ReadingSection::WordOrder { questions, .. } => questions
                .iter()
                .cloned()
                .map(Question::JapaneseTranslateWordOrderCombination)
                .collect(),
            ReadingSection::ReadContentAndAnswer { questions, .. } => {
                questions.iter().cloned().map(Question::from).collect()
            }
            ReadingSection::MultipleReadContentAndAnswer { parts } => parts
                .iter()
                .flat_map(|part| part.questions.iter().cloned().map(Question::from))
                .collect(),
        }
    }
}

impl ListeningSection {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ListeningSection::SelectResponseByConversation { .. } => {
                "SelectResponseByConversationSection"
            }
            ListeningSection::SelectSentenceByEnglishSentence { .. } => {
                "SelectSentenceByEnglishSentenceSection"
            }
            ListeningSection::Reallife { .. } => "ReallifeSection",
        }
    }

    pub fn questions(&self) -> Vec<Question> {
        match self {
            ListeningSection::SelectResponseByConversation { questions } => questions
                .iter()
                .cloned()
                .map(Question::SelectResponseByConversation)
                .collect(),
            ListeningSection::SelectSentenceByEnglishSentence { questions } => questions
                .iter()
                .cloned()
                .map(Question::SelectSentenceByEnglishSentence)
                .collect(),
            ListeningSection::Reallife { questions } => {
                questions.iter().cloned().map(Question::Reallife).collect()
            }
        }
    }
}
