use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::agent::{register_agent, AgentDescriptor, AgentRegistry};
use crate::error::{Result, StudyFlowError};
use crate::llm::LlmSettings;
use crate::utils::SettingsValidator;

use super::settings::ModelPolicy;
use super::yaml::{from_yaml_value, key_to_string, parse_yaml, read_config};

/// 共享模型配置块的键名，不作为 agent 处理
pub const LLM_CONFIGS_KEY: &str = "llm_configs";

#[derive(Debug, Deserialize)]
struct AgentEntry {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    goal: Option<String>,
    #[serde(default)]
    backstory: Option<String>,
    /// 引用 `llm_configs` 中的命名模型
    #[serde(default)]
    llm: Option<String>,
    /// 内联模型参数，优先于 `llm`
    #[serde(default)]
    llm_config: Option<LlmSettings>,
}

/// 模型解析策略
#[derive(Debug, Clone)]
pub struct AgentLoadOptions {
    pub policy: ModelPolicy,
    pub default_model: LlmSettings,
}

impl Default for AgentLoadOptions {
    fn default() -> Self {
        Self {
            policy: ModelPolicy::Fallback,
            default_model: LlmSettings::default(),
        }
    }
}

pub fn load_agents(path: impl AsRef<Path>, options: &AgentLoadOptions) -> Result<AgentRegistry> {
    let path = path.as_ref();
    let contents = read_config(path)?;
    load_agents_from_str(&contents, &path.display().to_string(), options)
}

pub fn load_agents_from_str(
    contents: &str,
    origin: &str,
    options: &AgentLoadOptions,
) -> Result<AgentRegistry> {
    let root: serde_yaml::Mapping = parse_yaml(origin, contents)?;

    let llm_configs: BTreeMap<String, LlmSettings> = match root.get(LLM_CONFIGS_KEY) {
        Some(value) => from_yaml_value(&format!("{origin} ({LLM_CONFIGS_KEY})"), value.clone())?,
        None => BTreeMap::new(),
    };

    let mut agents = AgentRegistry::new();
    for (key, value) in root {
        let name = key_to_string(&key).ok_or_else(|| StudyFlowError::MissingKey {
            owner: origin.to_string(),
            key: "agent name".into(),
        })?;
        if name == LLM_CONFIGS_KEY {
            continue;
        }

        let entry: AgentEntry = from_yaml_value(&format!("agent `{name}`"), value)?;
        let llm = resolve_model(&name, &entry, &llm_configs, options)?;
        SettingsValidator::validate_llm(&name, &llm)?;
        let descriptor = AgentDescriptor::new(
            name.clone(),
            required(&name, "role", entry.role)?,
            required(&name, "goal", entry.goal)?,
            required(&name, "backstory", entry.backstory)?,
            llm,
        );
        tracing::debug!(agent = %name, model = %descriptor.llm.model, "agent loaded");
        register_agent(descriptor, &mut agents);
    }

    tracing::info!(count = agents.len(), "agents loaded");
    Ok(agents)
}

fn required(agent: &str, key: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| StudyFlowError::MissingKey {
        owner: format!("agent `{agent}`"),
        key: key.to_string(),
    })
}

fn resolve_model(
    agent: &str,
    entry: &AgentEntry,
    llm_configs: &BTreeMap<String, LlmSettings>,
    options: &AgentLoadOptions,
) -> Result<LlmSettings> {
    if let Some(inline) = &entry.llm_config {
        return Ok(inline.clone());
    }

    let Some(reference) = &entry.llm else {
        return Ok(options.default_model.clone());
    };

    match llm_configs.get(reference) {
        Some(settings) => Ok(settings.clone()),
        None => match options.policy {
            ModelPolicy::FailFast => Err(StudyFlowError::UnknownModel {
                agent: agent.to_string(),
                model: reference.clone(),
            }),
            ModelPolicy::Fallback => {
                tracing::warn!(
                    agent = %agent,
                    model = %reference,
                    fallback = %options.default_model.model,
                    "model config not found, using default model"
                );
                Ok(options.default_model.clone())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::llm::config::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};

    const AGENTS: &str = r#"
llm_configs:
  fast:
    model: openai/gpt-4o-mini
    temperature: 0.2
    api_key: ${OPENAI_API_KEY}
extractor:
  role: Content Extractor
  goal: Extract the key information
  backstory: Meticulous analyst
  llm: fast
writer:
  role: Content Writer
  goal: Write summaries
  backstory: Seasoned writer
  verbose: true
"#;

    #[test]
    fn shared_and_default_models_are_resolved() {
        let agents = load_agents_from_str(AGENTS, "agents.yaml", &AgentLoadOptions::default()).unwrap();
        assert_eq!(agents.len(), 2);
        assert!(!agents.contains_key(LLM_CONFIGS_KEY));

        let extractor = &agents["extractor"];
        assert_eq!(extractor.llm.model, "openai/gpt-4o-mini");
        assert_eq!(extractor.llm.temperature, 0.2);
        assert_eq!(extractor.llm.api_key.as_deref(), Some("${OPENAI_API_KEY}"));

        let writer = &agents["writer"];
        assert_eq!(writer.llm.model, DEFAULT_MODEL);
        assert_eq!(writer.llm.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn inline_model_wins_over_reference() {
        let yaml = r#"
llm_configs:
  fast: { model: openai/gpt-4o-mini }
solo:
  role: r
  goal: g
  backstory: b
  llm: fast
  llm_config:
    model: ollama/llama3
    temperature: 0.1
"#;
        let agents = load_agents_from_str(yaml, "inline", &AgentLoadOptions::default()).unwrap();
        assert_eq!(agents["solo"].llm.model, "ollama/llama3");
    }

    #[test]
    fn missing_model_reference_respects_policy() {
        let yaml = "lonely:\n  role: r\n  goal: g\n  backstory: b\n  llm: nowhere\n";

        let agents = load_agents_from_str(yaml, "fallback", &AgentLoadOptions::default()).unwrap();
        assert_eq!(agents["lonely"].llm.model, DEFAULT_MODEL);

        let strict = AgentLoadOptions {
            policy: ModelPolicy::FailFast,
            ..AgentLoadOptions::default()
        };
        let err = load_agents_from_str(yaml, "strict", &strict).unwrap_err();
        assert!(matches!(err, StudyFlowError::UnknownModel { ref model, .. } if model == "nowhere"));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn missing_required_field_is_config_error() {
        let yaml = "incomplete:\n  role: r\n  goal: g\n";
        let err = load_agents_from_str(yaml, "agents", &AgentLoadOptions::default()).unwrap_err();
        assert!(matches!(err, StudyFlowError::MissingKey { ref key, .. } if key == "backstory"));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = load_agents("/definitely/not/here/agents.yaml", &AgentLoadOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn invalid_model_parameters_are_rejected() {
        let yaml = "hot:\n  role: r\n  goal: g\n  backstory: b\n  llm_config:\n    model: openai/gpt-4o\n    temperature: 9.0\n";
        let err = load_agents_from_str(yaml, "agents", &AgentLoadOptions::default()).unwrap_err();
        assert!(matches!(err, StudyFlowError::InvalidSetting { .. }));
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
