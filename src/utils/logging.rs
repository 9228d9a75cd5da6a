/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use crate::config::Config;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// `RUST_LOG` 优先；未设置时 `verbose` 决定 debug 还是 info。
/// 重复调用不会报错（测试中可能多次初始化）。
///
/// # 参数
/// - `verbose`: 是否显示详细日志
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("eiken_ast={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 本次运行的配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - 标记转 AST ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📂 输入目录: {}", config.input_dir.display());
    info!("📁 输出目录: {}", config.output_dir.display());
    info!("📊 最大并发数: {}", config.max_concurrent_files);
    info!("{}", "=".repeat(60));
}

/// 记录输入加载信息
///
/// # 参数
/// - `files`: 标记文件总数
/// - `tests`: 涉及的考试数
/// - `malformed`: 被跳过的 jsonl 行数
pub fn log_sources_loaded(files: usize, tests: usize, malformed: usize) {
    info!("✓ 找到 {} 个标记文件，属于 {} 场考试", files, tests);
    if malformed > 0 {
        info!("⚠️ 跳过 {} 行格式错误的 jsonl 记录", malformed);
    }
}

/// 记录单场考试写出
///
/// # 参数
/// - `test_id`: 考试 ID
/// - `path`: 输出路径
/// - `questions`: 题目总数
/// - `unknown_answers`: 答案缺失的题目数
pub fn log_test_written(test_id: &str, path: &Path, questions: usize, unknown_answers: usize) {
    if unknown_answers > 0 {
        info!(
            "[考试 {}] ✓ 已写出 {} ({} 道题，{} 道缺少答案)",
            test_id,
            path.display(),
            questions,
            unknown_answers
        );
    } else {
        info!(
            "[考试 {}] ✓ 已写出 {} ({} 道题)",
            test_id,
            path.display(),
            questions
        );
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `files`: 处理的文件数
/// - `tests`: 写出的考试数
/// - `questions`: 题目总数
/// - `warnings`: 警告条数
/// - `warn_file`: 警告文件路径
pub fn print_final_stats(
    files: usize,
    tests: usize,
    questions: usize,
    warnings: usize,
    warn_file: &Path,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 文件: {}", files);
    info!("✅ 考试: {}", tests);
    info!("📝 题目: {}", questions);
    info!("⚠️ 警告: {}", warnings);
    info!("{}", "=".repeat(60));
    if warnings > 0 {
        info!("\n警告已追加至: {}", warn_file.display());
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("短い", 5), "短い");
        assert_eq!(truncate_text("ひらがなカタカナ", 4), "ひらがな...");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
