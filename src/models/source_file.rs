use std::fmt;

/// 一份待转换的标记文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// 所属考试的 ID（父目录名，顶层文件为 `_root`）
    pub test_id: String,
    /// 文件名，同一考试内按它的字典序处理
    pub file_name: String,
    pub markup: String,
}

impl SourceFile {
    pub fn new(
        test_id: impl Into<String>,
        file_name: impl Into<String>,
        markup: impl Into<String>,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            file_name: file_name.into(),
            markup: markup.into(),
        }
    }

    /// 日志与警告里使用的标签
    pub fn label(&self) -> String {
        format!("{}/{}", self.test_id, self.file_name)
    }

    /// 去掉扩展名的文件名，小写
    pub fn stem(&self) -> String {
        let stem = match self.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => self.file_name.as_str(),
        };
        stem.to_lowercase()
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[文件 {}]", self.label())
    }
}
