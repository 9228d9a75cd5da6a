use crate::models::section::{ListeningSection, ReadingSection};
use serde::{Deserialize, Serialize};

/// 一次考试（级别/年度/回次）对应的顶层 AST 文档
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDocument {
    pub reading_sections: Vec<ReadingSection>,
    pub listening_sections: Vec<ListeningSection>,
}

impl TestDocument {
    pub fn question_count(&self) -> usize {
        let reading: usize = self.reading_sections.iter().map(|s| s.questions().len()).sum();
        let listening: usize = self
            .listening_sections
            .iter()
            .map(|s| s.questions().len())
            .sum();
        reading + listening
    }

    /// 没有标记答案的题目数
    pub fn unknown_answer_count(&self) -> usize {
        self.reading_sections
            .iter()
            .flat_map(ReadingSection::questions)
            .chain(self.listening_sections.iter().flat_map(ListeningSection::questions))
            .filter(|q| !q.has_known_answer())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_shape() {
        let doc = TestDocument::default();
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            serde_json::json!({"readingSections": [], "listeningSections": []})
        );
        assert_eq!(doc.question_count(), 0);
    }
}
