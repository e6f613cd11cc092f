use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StudyFlowError};

/// 单个任务的执行结果
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskOutput {
    pub task: String,
    pub agent_role: String,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<Value>,
    /// 结构化结果对应的 schema 名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
}

impl TaskOutput {
    /// 作为下游任务上下文时使用的文本；结构化结果以缩进 JSON 呈现
    pub fn as_context(&self) -> String {
        match &self.structured {
            Some(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| self.raw.clone()),
            None => self.raw.clone(),
        }
    }
}

/// 一次完整运行的结果，保持执行顺序
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineRun {
    outputs: Vec<TaskOutput>,
}

impl PipelineRun {
    pub(crate) fn push(&mut self, output: TaskOutput) {
        self.outputs.push(output);
    }

    pub fn outputs(&self) -> &[TaskOutput] {
        &self.outputs
    }

    pub fn get(&self, task: &str) -> Option<&TaskOutput> {
        self.outputs.iter().find(|output| output.task == task)
    }

    pub fn final_output(&self) -> Option<&TaskOutput> {
        self.outputs.last()
    }

    pub fn structured(&self, task: &str) -> Option<&Value> {
        self.get(task).and_then(|output| output.structured.as_ref())
    }

    /// 最后一个产生结构化结果的任务
    pub fn last_structured(&self) -> Option<&TaskOutput> {
        self.outputs.iter().rev().find(|output| output.structured.is_some())
    }

    pub fn structured_as<T: DeserializeOwned>(&self, task: &str) -> Result<Option<T>> {
        self.structured(task)
            .map(|value| {
                serde_json::from_value(value.clone())
                    .map_err(|e| StudyFlowError::Serialization(e.to_string()))
            })
            .transpose()
    }

    pub fn written_files(&self) -> Vec<&Path> {
        self.outputs
            .iter()
            .filter_map(|output| output.output_file.as_deref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
