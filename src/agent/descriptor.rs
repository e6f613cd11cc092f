use serde::Serialize;

use crate::llm::LlmSettings;

/// Agent 描述
///
/// 构造后不可变；同一次运行中分配给它的所有任务共享同一个实例。
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AgentDescriptor {
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub llm: LlmSettings,
}

impl AgentDescriptor {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: LlmSettings,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            llm,
        }
    }
}
