use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 遇到未知 section 根节点时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownSectionPolicy {
    /// 中止整个批次
    #[default]
    Abort,
    /// 跳过该节点并记录警告
    Skip,
}

impl FromStr for UnknownSectionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM 输出的标记文件目录
    pub input_dir: PathBuf,
    /// AST JSON 输出目录
    pub output_dir: PathBuf,
    /// 是否覆盖已存在的输出
    pub overwrite: bool,
    /// 同时解析的文件数量
    pub max_concurrent_files: usize,
    /// 未知 section 的处理策略
    pub unknown_section_policy: UnknownSectionPolicy,
    /// 数据质量警告写入的文件
    pub warn_file: PathBuf,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("output_markup"),
            output_dir: PathBuf::from("output_ast"),
            overwrite: false,
            max_concurrent_files: 8,
            unknown_section_policy: UnknownSectionPolicy::Abort,
            warn_file: PathBuf::from("warn.txt"),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 默认配置叠加环境变量
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env()
    }

    /// 从 TOML 文件加载配置，未给出的字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::AppError::file_read_failed(path, e))?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env(self) -> AppResult<Self> {
        Ok(Self {
            input_dir: env_var("INPUT_DIR").map(PathBuf::from).unwrap_or(self.input_dir),
            output_dir: env_var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(self.output_dir),
            overwrite: env_parse("OVERWRITE", "bool")?.unwrap_or(self.overwrite),
            max_concurrent_files: env_parse("MAX_CONCURRENT_FILES", "usize")?
                .unwrap_or(self.max_concurrent_files),
            unknown_section_policy: match env_var("UNKNOWN_SECTION_POLICY") {
                Some(v) => v.parse()?,
                None => self.unknown_section_policy,
            },
            warn_file: env_var("WARN_FILE").map(PathBuf::from).unwrap_or(self.warn_file),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match env_var(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("abort".parse::<UnknownSectionPolicy>().unwrap(), UnknownSectionPolicy::Abort);
        assert_eq!(" SKIP ".parse::<UnknownSectionPolicy>().unwrap(), UnknownSectionPolicy::Skip);
        assert!("retry".parse::<UnknownSectionPolicy>().is_err());
    }

    #[test]
    fn test_toml_partial_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output_dir = \"ast\"\nunknown_section_policy = \"skip\"").unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("ast"));
        assert_eq!(config.unknown_section_policy, UnknownSectionPolicy::Skip);
        assert_eq!(config.input_dir, PathBuf::from("output_markup"));
        assert!(!config.overwrite);
    }

    #[test]
    fn test_toml_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "overwrite = \"maybe\"").unwrap();
        assert!(Config::from_toml_file(file.path()).is_err());
    }
}
