use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyFlowError};
use crate::llm::LlmSettings;
use crate::quiz::QuizConfig;

use super::agents::AgentLoadOptions;
use super::yaml::{parse_yaml, read_config};

/// 命名模型引用缺失时的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ModelPolicy {
    /// 使用默认模型并记录警告
    #[default]
    Fallback,
    /// 直接返回配置错误
    FailFast,
}

/// 运行级配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub agents_config: PathBuf,
    pub tasks_config: PathBuf,
    /// 相对 `output_dir`
    pub extracted_info_file: PathBuf,
    /// 相对 `output_dir`
    pub combined_output_file: PathBuf,
    pub model_policy: ModelPolicy,
    pub default_model: LlmSettings,
    pub quiz: QuizConfig,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("./input/source.md"),
            output_dir: PathBuf::from("./output"),
            agents_config: PathBuf::from("./configs/agents.yaml"),
            tasks_config: PathBuf::from("./configs/tasks.yaml"),
            extracted_info_file: PathBuf::from("extracted_info.json"),
            combined_output_file: PathBuf::from("combined_output.md"),
            model_policy: ModelPolicy::Fallback,
            default_model: LlmSettings::default(),
            quiz: QuizConfig::default(),
        }
    }
}

impl PipelineSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = read_config(path)?;
        Self::from_yaml_str(&contents, &path.display().to_string())
    }

    pub fn from_yaml_str(contents: &str, origin: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        parse_yaml(origin, contents)
    }

    pub fn extracted_info_path(&self) -> PathBuf {
        self.output_dir.join(&self.extracted_info_file)
    }

    pub fn combined_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.combined_output_file)
    }

    pub fn agent_options(&self) -> AgentLoadOptions {
        AgentLoadOptions {
            policy: self.model_policy,
            default_model: self.default_model.clone(),
        }
    }

    /// 读取源文档；文件不存在属于输入错误
    pub fn read_source_document(&self) -> Result<String> {
        read_source_document(&self.input_file)
    }
}

pub fn read_source_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        tracing::error!(path = %path.display(), "source document not readable");
        StudyFlowError::Input {
            path: path.to_path_buf(),
            source,
        }
    })
}
