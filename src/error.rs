use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 标记解析错误
    #[error("标记错误: {0}")]
    Markup(#[from] MarkupError),
    /// 文档组装错误
    #[error("组装错误: {0}")]
    Assembly(#[from] AssemblyError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 目录不存在
    #[error("目录不存在: {}", path.display())]
    DirectoryNotFound { path: PathBuf },
    /// 读取文件失败
    #[error("读取文件失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON 序列化失败
    #[error("JSON序列化失败 ({}): {source}", path.display())]
    JsonFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 标记解析错误
#[derive(Debug, Error)]
pub enum MarkupError {
    /// 标记中没有任何可识别的根节点
    #[error("{file} 中没有 reading_sections / listening_sections 根节点")]
    NoSectionRoot { file: String },
}

/// 文档组装错误
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// 输出文件已存在且未允许覆盖
    #[error("输出文件已存在: {} (使用 --overwrite 覆盖)", path.display())]
    OutputExists { path: PathBuf },
    /// 未知的 section 类型
    #[error("未知的 section 类型 <{name}> (文件: {file})")]
    UnknownSectionType { file: String, name: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({}): {source}", path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 未知的策略名
    #[error("未知的 unknown-section 策略: {0} (可选: abort, skip)")]
    UnknownPolicy(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建输出冲突错误
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        AppError::Assembly(AssemblyError::OutputExists { path: path.into() })
    }

    /// 创建未知 section 类型错误
    pub fn unknown_section(file: impl Into<String>, name: impl Into<String>) -> Self {
        AppError::Assembly(AssemblyError::UnknownSectionType {
            file: file.into(),
            name: name.into(),
        })
    }

    /// 是否为需要用户介入的覆盖拒绝
    pub fn is_output_conflict(&self) -> bool {
        matches!(self, AppError::Assembly(AssemblyError::OutputExists { .. }))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_exists_message_contains_path() {
        let err = AppError::output_exists("out/a.json");
        assert!(err.is_output_conflict());
        assert!(err.to_string().contains("out/a.json"));
    }

    #[test]
    fn test_unknown_section_is_not_conflict() {
        let err = AppError::unknown_section("a/reading_1.txt", "vocab_sections");
        assert!(!err.is_output_conflict());
        assert!(err.to_string().contains("vocab_sections"));
    }
}
