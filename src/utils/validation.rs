use crate::error::{Result, StudyFlowError};
use crate::llm::LlmSettings;

/// 模型配置验证器
pub struct SettingsValidator;

impl SettingsValidator {
    /// 验证一个 agent 的模型参数
    pub fn validate_llm(agent: &str, settings: &LlmSettings) -> Result<()> {
        let invalid = |message: String| StudyFlowError::InvalidSetting {
            owner: format!("agent `{agent}`"),
            message,
        };

        Self::validate_model_name(&settings.model).map_err(invalid)?;
        Self::validate_temperature(settings.temperature).map_err(invalid)?;
        if let Some(url) = &settings.base_url {
            Self::validate_url(url).map_err(invalid)?;
        }
        if let Some(api_key) = &settings.api_key {
            Self::validate_api_key(api_key).map_err(invalid)?;
        }
        Ok(())
    }

    fn validate_model_name(model: &str) -> std::result::Result<(), String> {
        if model.trim().is_empty() {
            return Err("model name must not be empty".into());
        }
        if model.starts_with('/') || model.ends_with('/') {
            return Err(format!("model name `{model}` has an empty provider or model segment"));
        }
        Ok(())
    }

    fn validate_temperature(temperature: f32) -> std::result::Result<(), String> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(format!("temperature {temperature} is outside 0.0..=2.0"));
        }
        Ok(())
    }

    fn validate_url(url: &str) -> std::result::Result<(), String> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!("base_url `{url}` must start with http:// or https://"));
        }
        Ok(())
    }

    fn validate_api_key(api_key: &str) -> std::result::Result<(), String> {
        if api_key.trim().is_empty() {
            return Err("api_key must not be empty".into());
        }
        if api_key.starts_with("your_") {
            return Err("api_key looks like a placeholder".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        assert!(SettingsValidator::validate_llm("a", &LlmSettings::default()).is_ok());
    }

    #[test]
    fn temperature_out_of_range_is_rejected() {
        let settings = LlmSettings::default().with_temperature(3.5);
        let err = SettingsValidator::validate_llm("writer", &settings).unwrap_err();
        assert!(err.to_string().contains("agent `writer`"));
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn url_and_key_formats_are_checked() {
        let bad_url = LlmSettings::default().with_base_url("localhost:11434");
        assert!(SettingsValidator::validate_llm("a", &bad_url).is_err());

        let placeholder = LlmSettings::default().with_api_key("your_key_here");
        assert!(SettingsValidator::validate_llm("a", &placeholder).is_err());

        let reference = LlmSettings::default().with_api_key("${OPENROUTER_API_KEY}");
        assert!(SettingsValidator::validate_llm("a", &reference).is_ok());
    }
}
