//! 考试文档组装器 - 编排层
//!
//! ## 职责
//!
//! - 把同一考试的多个文件结果按文件名顺序拼接成 `TestDocument`
//! - 计算输出路径，检查覆盖冲突
//! - 写出格式化的 JSON

use crate::error::{AppError, AppResult, FileError};
use crate::models::TestDocument;
use crate::workflow::FileResult;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 组装所有考试
///
/// 结果先按 `(test_id, file_name)` 排序，与各文件的完成顺序无关。
///
/// # 参数
/// - `results`: 各文件的转换结果（任意顺序）
///
/// # 返回
/// 考试 ID → 文档，按 ID 排序
pub fn assemble(mut results: Vec<FileResult>) -> BTreeMap<String, TestDocument> {
    results.sort_by(|a, b| {
        (a.test_id.as_str(), a.file_name.as_str()).cmp(&(b.test_id.as_str(), b.file_name.as_str()))
    });

    let mut tests: BTreeMap<String, TestDocument> = BTreeMap::new();
    for result in results {
        let document = tests.entry(result.test_id).or_default();
        document.reading_sections.extend(result.reading_sections);
        document.listening_sections.extend(result.listening_sections);
    }
    tests
}

/// 考试的输出文件：`<output_dir>/<test_id>.json`
pub fn output_path(output_dir: &Path, test_id: &str) -> PathBuf {
    output_dir.join(format!("{}.json", test_id))
}

/// 在写出任何文件之前检查所有冲突
///
/// # 参数
/// - `paths`: 本次将要写出的文件
/// - `overwrite`: 是否允许覆盖
///
/// # 返回
/// 不允许覆盖且有文件已存在时返回 `OutputExists`
pub fn ensure_writable<'a>(
    paths: impl IntoIterator<Item = &'a Path>,
    overwrite: bool,
) -> AppResult<()> {
    if overwrite {
        return Ok(());
    }
    match paths.into_iter().find(|p| p.exists()) {
        Some(existing) => Err(AppError::output_exists(existing)),
        None => Ok(()),
    }
}

/// 写出一个考试文档
///
/// # 参数
/// - `path`: 输出文件路径，父目录不存在时自动创建
/// - `document`: 考试文档
/// - `overwrite`: 是否允许覆盖
pub fn write_test_document(path: &Path, document: &TestDocument, overwrite: bool) -> AppResult<()> {
    if !overwrite && path.exists() {
        return Err(AppError::output_exists(path));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AppError::file_write_failed(parent, e))?;
    }

    let json = serde_json::to_string_pretty(document).map_err(|source| FileError::JsonFailed {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|e| AppError::file_write_failed(path, e))?;
    Ok(())
}
