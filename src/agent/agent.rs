use std::sync::Arc;

use crate::error::Result;
use crate::llm::{DynLlmClient, LlmRequest};
use crate::schema::Schema;

use super::descriptor::AgentDescriptor;
use super::prompt::PromptBuilder;

/// 运行时 Agent：描述 + 绑定的 LLM 客户端
#[derive(Clone)]
pub struct LlmAgent {
    descriptor: Arc<AgentDescriptor>,
    client: DynLlmClient,
}

impl std::fmt::Debug for LlmAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmAgent")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl LlmAgent {
    pub fn new(descriptor: Arc<AgentDescriptor>, client: DynLlmClient) -> Self {
        Self { descriptor, client }
    }

    pub fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// 执行一次任务 prompt，返回模型的原始文本回答
    pub async fn execute(&self, task_prompt: String, schema: Option<&Schema>) -> Result<String> {
        let request = LlmRequest::new(task_prompt)
            .with_system(PromptBuilder::build_system_prompt(&self.descriptor))
            .with_temperature(self.descriptor.llm.temperature)
            .with_response_schema(schema.cloned());
        let response = self.client.complete(request).await?;
        Ok(response.content)
    }
}
