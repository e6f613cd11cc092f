use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "openrouter/google/gemini-pro-1.5";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// 模型参数
///
/// `api_key` 可以是明文，也可以是 `${ENV_VAR}` 形式的环境变量引用。
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LlmSettings {
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: None,
            api_key: None,
        }
    }
}

impl LlmSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}
