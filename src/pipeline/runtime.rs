use std::collections::HashMap;
use std::sync::Arc;

use crate::agent::{AgentDescriptor, AgentRegistry, LlmAgent};
use crate::error::{Result, StudyFlowError};
use crate::llm::{DynLlmClient, LlmClientFactory};

/// 执行期上下文：为每个 agent 绑定 LLM 客户端
///
/// 显式传入 executor，不依赖任何全局状态。
#[derive(Clone, Default)]
pub struct RuntimeContext {
    clients: HashMap<String, DynLlmClient>,
    shared: Option<DynLlmClient>,
}

impl RuntimeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有 agent 共用同一个客户端（测试、`--dry-run`）
    pub fn with_client(client: DynLlmClient) -> Self {
        Self {
            clients: HashMap::new(),
            shared: Some(client),
        }
    }

    /// 按 agent 的模型配置创建客户端
    pub fn from_agents(agents: &AgentRegistry) -> Result<Self> {
        let mut runtime = Self::new();
        for (name, descriptor) in agents {
            let client = LlmClientFactory::create_client(&descriptor.llm)?;
            tracing::debug!(agent = %name, model = %descriptor.llm.model, "LLM client ready");
            runtime.insert(name.clone(), client);
        }
        Ok(runtime)
    }

    pub fn insert(&mut self, agent: impl Into<String>, client: DynLlmClient) {
        self.clients.insert(agent.into(), client);
    }

    pub fn client(&self, agent: &str) -> Option<&DynLlmClient> {
        self.clients.get(agent).or(self.shared.as_ref())
    }

    pub fn agent(&self, descriptor: &Arc<AgentDescriptor>) -> Result<LlmAgent> {
        let client = self
            .client(&descriptor.name)
            .ok_or_else(|| StudyFlowError::UnknownAgent {
                owner: "runtime context".to_string(),
                agent: descriptor.name.clone(),
            })?;
        Ok(LlmAgent::new(Arc::clone(descriptor), Arc::clone(client)))
    }
}

impl std::fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut agents: Vec<&String> = self.clients.keys().collect();
        agents.sort();
        f.debug_struct("RuntimeContext")
            .field("agents", &agents)
            .field("shared", &self.shared.is_some())
            .finish()
    }
}
