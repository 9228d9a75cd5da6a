use serde::Serialize;
use std::fmt;

/// 数据质量问题的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// 未知的 content 类型，已按 passage 处理
    UnknownContentType,
    /// 没有找到标记答案
    MissingAnswer,
    /// 找不到所属材料或广播稿的题目
    OrphanQuestion,
    /// 对话大题中被舍弃的非对话题
    DroppedQuestion,
    /// 没有任何题目的材料
    ContentWithoutQuestions,
    /// 与前面材料 `index` 相同而被舍弃的材料
    DuplicateContentIndex,
    /// 不符合 “①-③” 形式的排序选项
    UnmatchedPairChoice,
    /// 未知的 section 根节点（skip 策略下）
    UnknownSectionType,
    /// 标记中没有 section 根节点
    NoSectionRoot,
    /// jsonl 中无法解析的行
    MalformedLine,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::UnknownContentType => "未知材料类型",
            DiagnosticKind::MissingAnswer => "缺少答案",
            DiagnosticKind::OrphanQuestion => "孤立题目",
            DiagnosticKind::DroppedQuestion => "舍弃题目",
            DiagnosticKind::ContentWithoutQuestions => "材料无题目",
            DiagnosticKind::DuplicateContentIndex => "材料编号重复",
            DiagnosticKind::UnmatchedPairChoice => "排序选项不匹配",
            DiagnosticKind::UnknownSectionType => "未知section",
            DiagnosticKind::NoSectionRoot => "无section根节点",
            DiagnosticKind::MalformedLine => "无效行",
        };
        f.write_str(label)
    }
}

/// 一条数据质量警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 来源文件（`<测试ID>/<文件名>`）
    pub file: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} | {}", self.file, self.kind, self.message)
    }
}
