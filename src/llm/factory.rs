#[cfg(feature = "openai-client")]
use std::sync::Arc;

use crate::config::EnvConfig;
use crate::error::{Result, StudyFlowError};
use super::client::DynLlmClient;
use super::config::LlmSettings;
use super::provider::Provider;
#[cfg(feature = "openai-client")]
use super::http::GenericHttpClient;

/// LLM 客户端工厂
///
/// 根据 `LlmSettings` 创建客户端：
/// - endpoint: 优先 `base_url`，否则使用提供商默认值
/// - api_key: 优先配置（支持 `${VAR}`），否则读取提供商约定的环境变量
/// - model: 去掉提供商前缀后的模型名
pub struct LlmClientFactory;

fn invalid(settings: &LlmSettings, message: impl Into<String>) -> StudyFlowError {
    StudyFlowError::InvalidSetting {
        owner: format!("model `{}`", settings.model),
        message: message.into(),
    }
}

impl LlmClientFactory {
    pub fn endpoint(settings: &LlmSettings) -> Result<String> {
        let (provider, _) = Provider::resolve(&settings.model);
        settings
            .base_url
            .clone()
            .or_else(|| provider.default_endpoint().map(str::to_string))
            .ok_or_else(|| {
                invalid(settings, "missing base_url; unknown provider prefixes need an explicit endpoint")
            })
    }

    pub fn api_key(settings: &LlmSettings) -> Result<Option<String>> {
        let (provider, _) = Provider::resolve(&settings.model);
        if let Some(configured) = &settings.api_key {
            return EnvConfig::resolve(configured)
                .map(Some)
                .map_err(|e| invalid(settings, format!("cannot resolve api_key: {e}")));
        }
        match provider.default_env_key() {
            Some(env_key) => match EnvConfig::get_env_optional(env_key) {
                Some(key) => {
                    tracing::info!(
                        provider = provider.as_str(),
                        env_key = env_key,
                        "Using API key from environment"
                    );
                    Ok(Some(key))
                }
                None if provider.requires_api_key() => Err(invalid(
                    settings,
                    format!("missing API key; set `api_key` in the model config or export {env_key}"),
                )),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    #[cfg(feature = "openai-client")]
    pub fn create_client(settings: &LlmSettings) -> Result<DynLlmClient> {
        let (_, wire_model) = Provider::resolve(&settings.model);
        let endpoint = Self::endpoint(settings)?;
        let api_key = Self::api_key(settings)?;
        let client = GenericHttpClient::new(endpoint, api_key, wire_model)?;
        Ok(Arc::new(client))
    }

    #[cfg(not(feature = "openai-client"))]
    pub fn create_client(settings: &LlmSettings) -> Result<DynLlmClient> {
        Err(invalid(
            settings,
            "an HTTP client is required; rebuild with the `openai-client` feature",
        ))
    }
}
