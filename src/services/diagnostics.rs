//! 数据质量警告收集 - 业务能力层
//!
//! 只负责记录问题并写日志，不修正数据

use crate::models::{Diagnostic, DiagnosticKind};
use crate::services::text_classifier::normalize_whitespace;
use crate::utils::logging::truncate_text;
use tracing::warn;

/// 单个文件的警告收集器
#[derive(Debug, Default)]
pub struct Diagnostics {
    file: String,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            items: Vec::new(),
        }
    }

    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        warn!("[文件 {}] ⚠️ {}: {}", self.file, kind, message);
        self.items.push(Diagnostic {
            file: self.file.clone(),
            kind,
            message,
        });
    }

    /// 记录一道没有标记答案的题
    pub fn missing_answer(&mut self, question_text: &str) {
        let preview = truncate_text(&normalize_whitespace(question_text), 40);
        self.report(
            DiagnosticKind::MissingAnswer,
            format!("未找到标记答案: {}", preview),
        );
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
