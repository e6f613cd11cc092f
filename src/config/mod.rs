pub mod agents;
pub mod env;
pub mod settings;
pub mod tasks;
pub mod template;
mod yaml;

pub use agents::{load_agents, load_agents_from_str, AgentLoadOptions, LLM_CONFIGS_KEY};
pub use env::EnvConfig;
pub use settings::{read_source_document, ModelPolicy, PipelineSettings};
pub use tasks::{
    load_tasks, load_tasks_from_str, OutputPaths, TaskPlan, TemplateValues, EXTRACTION_TASK,
    QUIZ_CONFIG_KEY, SOURCE_CONTENT_KEY,
};
pub use template::Substitutions;
