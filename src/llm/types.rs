use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Schema;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LlmMessage {
    pub role: String,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmRequest {
    #[serde(default)]
    pub system: Option<String>,
    pub user: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// 需要结构化回答时的目标 schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Schema>,
}

fn default_temperature() -> f32 {
    0.7
}

impl LlmRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            temperature: default_temperature(),
            response_schema: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_response_schema(mut self, schema: Option<Schema>) -> Self {
        self.response_schema = schema;
        self
    }

    pub fn messages(&self) -> Vec<LlmMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            messages.push(LlmMessage {
                role: "system".into(),
                content: system.clone(),
            });
        }
        messages.push(LlmMessage {
            role: "user".into(),
            content: self.user.clone(),
        });
        messages
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl LlmResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: None,
        }
    }
}
