//! 命令行参数
//!
//! 配置优先级：默认值 < `--config` 指定的 TOML < 环境变量 < 命令行参数

use crate::config::{Config, UnknownSectionPolicy};
use crate::error::AppResult;
use clap::Parser;
use std::path::PathBuf;

/// 把 LLM 输出的英检试题标记转换为 AST JSON
#[derive(Parser, Debug, Default)]
#[command(name = "eiken-ast", version)]
pub struct Cli {
    /// TOML 配置文件
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// 标记文件目录
    #[arg(short, long, value_name = "INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// AST JSON 输出目录
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// 覆盖已存在的输出文件
    #[arg(long)]
    pub overwrite: bool,

    /// 同时解析的文件数
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// 遇到未知 section 时: abort | skip
    #[arg(long = "on-unknown-section", value_name = "POLICY")]
    pub on_unknown_section: Option<UnknownSectionPolicy>,

    /// 警告追加写入的文件
    #[arg(long, value_name = "PATH")]
    pub warn_file: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 合并各层配置
    pub fn into_config(self) -> AppResult<Config> {
        let base = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };
        Ok(self.apply(base.with_env()?))
    }

    /// 只覆盖命令行上明确给出的值
    pub fn apply(self, config: Config) -> Config {
        Config {
            input_dir: self.input_dir.unwrap_or(config.input_dir),
            output_dir: self.output_dir.unwrap_or(config.output_dir),
            overwrite: self.overwrite || config.overwrite,
            max_concurrent_files: self.jobs.unwrap_or(config.max_concurrent_files),
            unknown_section_policy: self
                .on_unknown_section
                .unwrap_or(config.unknown_section_policy),
            warn_file: self.warn_file.unwrap_or(config.warn_file),
            verbose_logging: self.verbose || config.verbose_logging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "eiken-ast",
            "-i",
            "in",
            "--jobs",
            "3",
            "--on-unknown-section",
            "skip",
            "--overwrite",
        ])
        .unwrap();
        let config = cli.apply(Config::default());
        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("output_ast"));
        assert_eq!(config.max_concurrent_files, 3);
        assert_eq!(config.unknown_section_policy, UnknownSectionPolicy::Skip);
        assert!(config.overwrite);
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        assert!(Cli::try_parse_from(["eiken-ast", "--on-unknown-section", "retry"]).is_err());
    }

    #[test]
    fn test_cli_overrides_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eiken.toml");
        std::fs::write(&path, "output_dir = \"from_toml\"\nmax_concurrent_files = 2\n").unwrap();

        let cli = Cli {
            jobs: Some(5),
            ..Default::default()
        };
        let config = cli.apply(Config::from_toml_file(&path).unwrap());
        assert_eq!(config.output_dir, PathBuf::from("from_toml"));
        assert_eq!(config.max_concurrent_files, 5);
    }
}
