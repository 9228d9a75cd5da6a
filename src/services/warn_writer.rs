//! 警告写入服务 - 业务能力层
//!
//! 只负责把数据质量警告追加写入 warn.txt，不关心流程

use crate::models::Diagnostic;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 警告写入服务
///
/// 职责：
/// - 把转换过程中发现的数据质量问题写入 warn.txt
/// - 每条警告一行，带来源文件
/// - 不修改 AST，不决定流程
pub struct WarnWriter {
    warn_file_path: PathBuf,
}

impl WarnWriter {
    /// 创建新的警告写入服务
    pub fn new() -> Self {
        Self {
            warn_file_path: PathBuf::from("warn.txt"),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.warn_file_path
    }

    /// 追加写入一批警告
    ///
    /// # 参数
    /// - `diagnostics`: 警告列表，为空时不创建文件
    ///
    /// # 返回
    /// 返回写入的条数
    pub async fn write_all(&self, diagnostics: &[Diagnostic]) -> Result<usize> {
        if diagnostics.is_empty() {
            return Ok(0);
        }
        debug!(
            "写入 {} 条警告到 {}",
            diagnostics.len(),
            self.warn_file_path.display()
        );

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .await
            .with_context(|| format!("无法打开警告文件: {}", self.warn_file_path.display()))?;

        let mut buffer = String::new();
        for diagnostic in diagnostics {
            buffer.push_str(&diagnostic.to_string());
            buffer.push('\n');
        }
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;

        Ok(diagnostics.len())
    }
}

impl Default for WarnWriter {
    fn default() -> Self {
        Self::new()
    }
}
