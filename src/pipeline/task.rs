use std::path::PathBuf;
use std::sync::Arc;

use crate::agent::AgentDescriptor;
use crate::schema::Schema;

/// 任务声明的结构化输出
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Schema,
}

/// 已渲染、可执行的任务
///
/// `context` 只会引用定义顺序在它之前的任务，加载阶段保证不存在前向或循环引用。
#[derive(Debug, Clone)]
pub struct TaskDescriptor {
    pub name: String,
    pub description: String,
    pub expected_output: String,
    pub agent: Arc<AgentDescriptor>,
    pub context: Vec<Arc<TaskDescriptor>>,
    pub output_file: Option<PathBuf>,
    pub output_schema: Option<OutputSchema>,
}

impl TaskDescriptor {
    pub fn context_names(&self) -> impl Iterator<Item = &str> {
        self.context.iter().map(|task| task.name.as_str())
    }

    pub fn is_structured(&self) -> bool {
        self.output_schema.is_some()
    }
}
