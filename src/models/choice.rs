use crate::models::chunk::Text;
use serde::{Deserialize, Serialize};

/// 选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Choice {
    /// 普通的英文短语选项
    #[serde(rename = "EnglishPhraseChoice")]
    EnglishPhrase { choice: Text },
    /// 排序题的编号组合，如 ③-①
    #[serde(rename = "MultipleNumberChoice")]
    MultipleNumber { choices: Vec<u32> },
}
