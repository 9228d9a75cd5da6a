//! 批量转换处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文件的转换和输出。
//!
//! ## 核心功能
//!
//! 1. **批量加载**：扫描输入目录，加载所有标记文件（`Vec<SourceFile>`）
//! 2. **冲突检查**：在写出任何文件前确认不会误覆盖
//! 3. **并发控制**：使用 Semaphore 限制同时解析的文件数
//! 4. **按序组装**：结果按文件名排序后拼接为考试文档
//! 5. **全局统计**：汇总题目数和警告数
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文件的细节
//! - **向下委托**：单个文件交给 `workflow::FileFlow`

use crate::config::Config;
use crate::models::{load_sources, Diagnostic, SourceFile};
use crate::orchestrator::test_assembler;
use crate::services::WarnWriter;
use crate::utils::logging::{
    log_sources_loaded, log_startup, log_test_written, print_final_stats,
};
use crate::workflow::{FileFlow, FileResult};
use anyhow::{anyhow, Result};
use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 一次运行的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// 解析的标记文件数
    pub files: usize,
    /// 写出的考试文档数
    pub tests: usize,
    /// 题目总数
    pub questions: usize,
    /// 答案缺失的题目数
    pub unknown_answers: usize,
    /// 警告总数（含 jsonl 坏行）
    pub warnings: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    warn_writer: WarnWriter,
}

impl App {
    pub fn new(config: Config) -> Self {
        let warn_writer = WarnWriter::with_path(config.warn_file.clone());
        Self {
            config,
            warn_writer,
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunStats> {
        log_startup(&self.config);

        // 加载所有标记文件
        info!("\n📁 正在扫描输入目录...");
        let loaded = load_sources(&self.config.input_dir).await?;
        let malformed = loaded.malformed_lines();
        let mut diagnostics: Vec<Diagnostic> = loaded.diagnostics;

        let test_ids: BTreeSet<String> = loaded.files.iter().map(|f| f.test_id.clone()).collect();
        log_sources_loaded(loaded.files.len(), test_ids.len(), malformed);

        if loaded.files.is_empty() {
            warn!("⚠️ 没有找到待转换的标记文件，程序结束");
            self.warn_writer.write_all(&diagnostics).await?;
            return Ok(RunStats {
                warnings: diagnostics.len(),
                ..Default::default()
            });
        }

        // ========== 写出前先检查覆盖冲突 ==========
        let planned: Vec<_> = test_ids
            .iter()
            .map(|id| test_assembler::output_path(&self.config.output_dir, id))
            .collect();
        test_assembler::ensure_writable(
            planned.iter().map(|p| p.as_path()),
            self.config.overwrite,
        )?;

        // ========== 并发解析 ==========
        let total_files = loaded.files.len();
        let results = self.convert_all(loaded.files).await?;
        diagnostics.extend(results.iter().flat_map(|r| r.diagnostics.iter().cloned()));

        // ========== 组装并写出 ==========
        let tests = test_assembler::assemble(results);
        let mut stats = RunStats {
            files: total_files,
            ..Default::default()
        };
        for (test_id, document) in &tests {
            let path = test_assembler::output_path(&self.config.output_dir, test_id);
            test_assembler::write_test_document(&path, document, self.config.overwrite)?;

            let questions = document.question_count();
            let unknown = document.unknown_answer_count();
            log_test_written(test_id, &path, questions, unknown);

            stats.tests += 1;
            stats.questions += questions;
            stats.unknown_answers += unknown;
        }

        stats.warnings = self.warn_writer.write_all(&diagnostics).await?;

        print_final_stats(
            stats.files,
            stats.tests,
            stats.questions,
            stats.warnings,
            self.warn_writer.path(),
        );
        Ok(stats)
    }

    /// 并发解析所有文件
    ///
    /// 解析是纯 CPU 工作，放在阻塞线程池中执行；任一文件返回错误即中止。
    async fn convert_all(&self, files: Vec<SourceFile>) -> Result<Vec<FileResult>> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_files.max(1)));
        let flow = Arc::new(FileFlow::new(&self.config));
        let mut handles = Vec::with_capacity(files.len());

        for source in files {
            let permit = semaphore.clone().acquire_owned().await?;
            let flow = flow.clone();
            let label = source.label();

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                flow.run(&source)
            });
            handles.push((label, handle));
        }

        let joined = join_all(
            handles
                .into_iter()
                .map(|(label, handle)| async move { (label, handle.await) }),
        )
        .await;

        let mut results = Vec::with_capacity(joined.len());
        for (label, outcome) in joined {
            match outcome {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(e)) => {
                    error!("[文件 {}] ❌ 转换失败: {}", label, e);
                    return Err(e.into());
                }
                Err(e) => {
                    error!("[文件 {}] 任务执行失败: {}", label, e);
                    return Err(anyhow!("文件 {} 的解析任务异常退出: {}", label, e));
                }
            }
        }

        Ok(results)
    }
}
