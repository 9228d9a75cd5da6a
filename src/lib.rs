//! # Eiken AST
//!
//! 把 LLM 输出的英检试题标记转换为结构化 AST（JSON）的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 标记层（Markup）
//! - `markup/` - 宽松解析 LLM 输出，得到通用标记树
//! - 容忍未闭合或错配的标签，以及未转义的 `&` 与 `<`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个元素
//! - `chunk_builder` / `text_classifier` - 文本块切分与日英分类
//! - `choice_extractor` / `word_order` - 选项、答案与排序题
//! - `content_parser` / `flatten` - 材料解析与答案回填
//! - `Diagnostics` / `WarnWriter` - 收集并写出数据质量警告
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文件"的完整转换流程
//! - `reading_section` / `listening_section` - 大题识别与题目分组
//! - `FileFlow` - 流程编排（解析 → 找根节点 → 逐 section 转换）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文件转换，管理并发
//! - `orchestrator/test_assembler` - 按考试拼接并写出 JSON
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;
pub mod markup;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, UnknownSectionPolicy};
pub use error::{AppError, AppResult};
pub use markup::{parse_markup, Element, MarkupNode};
pub use models::{SourceFile, TestDocument};
pub use orchestrator::{App, RunStats};
pub use workflow::{FileFlow, FileResult};
