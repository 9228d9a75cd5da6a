//! 单文件转换流程 - 流程层
//!
//! 核心职责：定义"一个标记文件"的完整转换流程
//!
//! 流程顺序：
//! 1. 宽松解析标记文本
//! 2. 找到 `reading_sections` / `listening_sections` 根节点
//! 3. 逐个 section 交给阅读或听力解析
//! 4. 汇总大题和数据质量警告

use tracing::{debug, info};

use crate::config::{Config, UnknownSectionPolicy};
use crate::error::{AppError, AppResult, MarkupError};
use crate::markup::{parse_markup, Element};
use crate::models::{Diagnostic, DiagnosticKind, ListeningSection, ReadingSection, SourceFile};
use crate::services::diagnostics::Diagnostics;
use crate::workflow::listening_section::parse_listening_section;
use crate::workflow::reading_section::parse_reading_section;

const READING_ROOT: &str = "reading_sections";
const LISTENING_ROOT: &str = "listening_sections";

/// 根节点种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Reading,
    Listening,
}

impl RootKind {
    fn from_tag(name: &str) -> Option<Self> {
        match name {
            READING_ROOT => Some(RootKind::Reading),
            LISTENING_ROOT => Some(RootKind::Listening),
            _ => None,
        }
    }

    /// 没有根节点的裸 `section`，按文件名前缀推断
    pub fn from_stem(stem: &str) -> Option<Self> {
        if stem.starts_with("reading") {
            Some(RootKind::Reading)
        } else if stem.starts_with("listening") {
            Some(RootKind::Listening)
        } else {
            None
        }
    }
}

/// 单个文件的转换结果
#[derive(Debug, Clone, Default)]
pub struct FileResult {
    pub test_id: String,
    pub file_name: String,
    pub reading_sections: Vec<ReadingSection>,
    pub listening_sections: Vec<ListeningSection>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileResult {
    pub fn section_count(&self) -> usize {
        self.reading_sections.len() + self.listening_sections.len()
    }
}

/// 单文件转换流程
///
/// - 不做 I/O，只把一份标记文本变成大题列表
/// - 决定遇到未知根节点时中止还是跳过
pub struct FileFlow {
    policy: UnknownSectionPolicy,
}

impl FileFlow {
    pub fn new(config: &Config) -> Self {
        Self::with_policy(config.unknown_section_policy)
    }

    pub fn with_policy(policy: UnknownSectionPolicy) -> Self {
        Self { policy }
    }

    /// 转换一个标记文件
    ///
    /// # 参数
    /// - `source`: 标记文本及其所属考试
    ///
    /// # 返回
    /// 成功时返回大题与警告；`abort` 策略下遇到未知根节点返回错误
    pub fn run(&self, source: &SourceFile) -> AppResult<FileResult> {
        let label = source.label();
        debug!("[文件 {}] 📄 开始解析 ({} 字节)", label, source.markup.len());

        let document = parse_markup(&source.markup);
        let mut walk = Walk {
            flow: self,
            source,
            diag: Diagnostics::new(label.clone()),
            result: FileResult {
                test_id: source.test_id.clone(),
                file_name: source.file_name.clone(),
                ..Default::default()
            },
            roots_found: 0,
        };

        walk.container(&document)?;

        if walk.roots_found == 0 {
            let err = MarkupError::NoSectionRoot { file: label.clone() };
            walk.diag
                .report(DiagnosticKind::NoSectionRoot, err.to_string());
        }

        let Walk {
            diag, mut result, ..
        } = walk;
        result.diagnostics = diag.into_vec();

        info!(
            "[文件 {}] ✓ 解析完成: 阅读 {} 个大题, 听力 {} 个大题, 警告 {} 条",
            label,
            result.reading_sections.len(),
            result.listening_sections.len(),
            result.diagnostics.len()
        );
        Ok(result)
    }
}

/// 单次遍历的可变状态
struct Walk<'a> {
    flow: &'a FileFlow,
    source: &'a SourceFile,
    diag: Diagnostics,
    result: FileResult,
    roots_found: usize,
}

impl Walk<'_> {
    /// 顶层或包装元素：识别根节点，包装元素向下递归
    fn container(&mut self, el: &Element) -> AppResult<()> {
        for child in el.child_elements() {
            if let Some(kind) = RootKind::from_tag(&child.name) {
                self.roots_found += 1;
                self.root(kind, child)?;
            } else if child.is("section") {
                match RootKind::from_stem(&self.source.stem()) {
                    Some(kind) => {
                        self.roots_found += 1;
                        self.section(kind, child);
                    }
                    None => self.unknown(&child.name)?,
                }
            } else if child.has_descendant(READING_ROOT) || child.has_descendant(LISTENING_ROOT) {
                debug!("[文件 {}] 进入包装元素 <{}>", self.source.label(), child.name);
                self.container(child)?;
            } else {
                self.unknown(&child.name)?;
            }
        }
        Ok(())
    }

    fn root(&mut self, kind: RootKind, root: &Element) -> AppResult<()> {
        for child in root.child_elements() {
            if child.is("section") {
                self.section(kind, child);
            } else {
                self.unknown(&child.name)?;
            }
        }
        Ok(())
    }

    fn section(&mut self, kind: RootKind, section: &Element) {
        match kind {
            RootKind::Reading => {
                let sections = parse_reading_section(section, &mut self.diag);
                self.result.reading_sections.extend(sections);
            }
            RootKind::Listening => {
                let sections = parse_listening_section(section, &mut self.diag);
                self.result.listening_sections.extend(sections);
            }
        }
    }

    fn unknown(&mut self, name: &str) -> AppResult<()> {
        match self.flow.policy {
            UnknownSectionPolicy::Abort => {
                Err(AppError::unknown_section(self.source.label(), name))
            }
            UnknownSectionPolicy::Skip => {
                self.diag.report(
                    DiagnosticKind::UnknownSectionType,
                    format!("未知的 section 类型 <{}>，已跳过", name),
                );
                Ok(())
            }
        }
    }
}
