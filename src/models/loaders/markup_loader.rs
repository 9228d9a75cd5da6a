use crate::error::FileError;
use crate::models::diagnostic::{Diagnostic, DiagnosticKind};
use crate::models::source_file::SourceFile;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 输入目录顶层文件所属的考试 ID
pub const ROOT_TEST_ID: &str = "_root";

const MARKUP_EXTENSIONS: [&str; 2] = ["txt", "xml"];
const BATCH_EXTENSION: &str = "jsonl";

/// 扫描结果
#[derive(Debug, Default)]
pub struct LoadedSources {
    /// 按 (考试ID, 文件名) 排好序
    pub files: Vec<SourceFile>,
    /// jsonl 中被跳过的行
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadedSources {
    pub fn malformed_lines(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::MalformedLine)
            .count()
    }
}

/// jsonl 中的一行
#[derive(Debug, Deserialize)]
struct JsonlRecord {
    path: String,
    markup: String,
}

/// 由相对路径推出考试 ID：父目录名，没有父目录时为 `_root`
pub fn test_id_for(relative: &Path) -> String {
    relative
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| ROOT_TEST_ID.to_string())
}

/// 递归扫描输入目录，加载所有标记文件
pub async fn load_sources(input_dir: &Path) -> Result<LoadedSources> {
    if !input_dir.is_dir() {
        return Err(FileError::DirectoryNotFound {
            path: input_dir.to_path_buf(),
        }
        .into());
    }

    let mut loaded = LoadedSources::default();
    let mut pending: Vec<PathBuf> = vec![input_dir.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir)
            .await
            .with_context(|| format!("无法读取文件夹: {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
                continue;
            }

            let extension = path
                .extension()
                .and_then(|s| s.to_str())
                .map(str::to_lowercase)
                .unwrap_or_default();
            let relative = path.strip_prefix(input_dir).unwrap_or(&path).to_path_buf();

            if MARKUP_EXTENSIONS.contains(&extension.as_str()) {
                let markup = fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("无法读取标记文件: {}", path.display()))?;
                let file_name = relative
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                tracing::debug!("正在加载: {}", relative.display());
                loaded
                    .files
                    .push(SourceFile::new(test_id_for(&relative), file_name, markup));
            } else if extension == BATCH_EXTENSION {
                let content = fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("无法读取批量文件: {}", path.display()))?;
                let (files, diagnostics) =
                    parse_jsonl(&content, &relative.to_string_lossy());
                tracing::info!(
                    "从 {} 加载 {} 个标记，跳过 {} 行",
                    relative.display(),
                    files.len(),
                    diagnostics.len()
                );
                loaded.files.extend(files);
                loaded.diagnostics.extend(diagnostics);
            }
        }
    }

    loaded
        .files
        .sort_by(|a, b| (&a.test_id, &a.file_name).cmp(&(&b.test_id, &b.file_name)));
    Ok(loaded)
}

/// 解析 jsonl 批量输入
///
/// 每行为 `{"path": "<考试ID>/<文件名>", "markup": "..."}`。
/// 无法解析的行跳过并计数，不会中断整个文件。
pub fn parse_jsonl(content: &str, origin: &str) -> (Vec<SourceFile>, Vec<Diagnostic>) {
    let mut files = Vec::new();
    let mut diagnostics = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let record = serde_json::from_str::<JsonlRecord>(line)
            .map_err(|e| e.to_string())
            .and_then(|record| {
                let relative = PathBuf::from(&record.path);
                match relative.file_name() {
                    Some(name) => Ok(SourceFile::new(
                        test_id_for(&relative),
                        name.to_string_lossy().into_owned(),
                        record.markup,
                    )),
                    None => Err(format!("path 字段无效: {:?}", record.path)),
                }
            });

        match record {
            Ok(file) => files.push(file),
            Err(reason) => {
                tracing::warn!("⚠️ {} 第 {} 行无法解析，已跳过: {}", origin, line_no + 1, reason);
                diagnostics.push(Diagnostic {
                    file: origin.to_string(),
                    kind: DiagnosticKind::MalformedLine,
                    message: format!("第 {} 行: {}", line_no + 1, reason),
                });
            }
        }
    }

    (files, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_id_for() {
        assert_eq!(test_id_for(Path::new("grade3-2024-1/reading_1.txt")), "grade3-2024-1");
        assert_eq!(test_id_for(Path::new("reading_1.txt")), ROOT_TEST_ID);
        assert_eq!(test_id_for(Path::new("batch/a/listening.txt")), "a");
    }

    #[test]
    fn test_parse_jsonl_skips_and_counts_bad_lines() {
        let content = concat!(
            r#"{"path": "a/reading_1.txt", "markup": "<reading_sections/>"}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"path": "listening.txt", "markup": "<listening_sections/>"}"#,
            "\n",
            r#"{"path": "a/x.txt"}"#,
            "\n",
        );
        let (files, diagnostics) = parse_jsonl(content, "batch.jsonl");

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].test_id, "a");
        assert_eq!(files[0].file_name, "reading_1.txt");
        assert_eq!(files[1].test_id, ROOT_TEST_ID);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.starts_with("第 2 行"));
        assert!(diagnostics[1].message.starts_with("第 5 行"));
    }

    #[tokio::test]
    async fn test_load_sources_sorted_by_test_and_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("b/reading_1.txt"), "<reading_sections/>").unwrap();
        std::fs::write(dir.path().join("a/reading_2.txt"), "<reading_sections/>").unwrap();
        std::fs::write(dir.path().join("a/listening_1.xml"), "<listening_sections/>").unwrap();
        std::fs::write(dir.path().join("a/notes.md"), "ignored").unwrap();

        let loaded = load_sources(dir.path()).await.unwrap();
        let labels: Vec<String> = loaded.files.iter().map(SourceFile::label).collect();
        assert_eq!(labels, vec!["a/listening_1.xml", "a/reading_2.txt", "b/reading_1.txt"]);
        assert_eq!(loaded.malformed_lines(), 0);
    }

    #[test]
    fn test_load_sources_missing_dir() {
        let result = tokio_test::block_on(load_sources(Path::new("/definitely/not/here")));
        assert!(result.unwrap_err().to_string().contains("目录不存在"));
    }
}
