use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaError;

pub type Result<T> = std::result::Result<T, StudyFlowError>;

#[derive(Debug, Error)]
pub enum StudyFlowError {
    #[error("cannot read config file `{path}`: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config `{origin}`: {source}")]
    ConfigParse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("missing key `{key}` in {owner}")]
    MissingKey { owner: String, key: String },
    #[error("agent `{agent}` not defined (referenced by `{owner}`)")]
    UnknownAgent { owner: String, agent: String },
    #[error("task `{task}` depends on `{dependency}`, which is not defined before it")]
    UnknownTask { task: String, dependency: String },
    #[error("model config `{model}` not defined (referenced by agent `{agent}`)")]
    UnknownModel { agent: String, model: String },
    #[error("invalid setting in {owner}: {message}")]
    InvalidSetting { owner: String, message: String },
    #[error("template error in {owner}: {message}")]
    Template { owner: String, message: String },
    #[error("cannot read source document `{path}`: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("task `{task}` failed: {message}")]
    Execution { task: String, message: String },
    #[error("task `{task}` returned invalid structured output: {message}")]
    StructuredOutput { task: String, message: String },
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("cannot write `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 错误分类，对应运行的不同阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Input,
    Execution,
    Output,
}

impl StudyFlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StudyFlowError::ConfigFile { .. }
            | StudyFlowError::ConfigParse { .. }
            | StudyFlowError::MissingKey { .. }
            | StudyFlowError::UnknownAgent { .. }
            | StudyFlowError::UnknownTask { .. }
            | StudyFlowError::UnknownModel { .. }
            | StudyFlowError::Template { .. }
            | StudyFlowError::InvalidSetting { .. }
            | StudyFlowError::Schema(SchemaError::NotRegistered(_)) => ErrorKind::Config,
            StudyFlowError::Input { .. } => ErrorKind::Input,
            StudyFlowError::Execution { .. }
            | StudyFlowError::StructuredOutput { .. }
            | StudyFlowError::Schema(_)
            | StudyFlowError::Other(_) => ErrorKind::Execution,
            StudyFlowError::Io { .. } | StudyFlowError::Serialization(_) => ErrorKind::Output,
        }
    }

    pub(crate) fn execution(task: impl Into<String>, message: impl std::fmt::Display) -> Self {
        StudyFlowError::Execution {
            task: task.into(),
            message: message.to_string(),
        }
    }
}
