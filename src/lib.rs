pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod quiz;
pub mod schema;
pub mod utils;

pub use agent::{register_agent, AgentDescriptor, AgentRegistry, LlmAgent, PromptBuilder};
pub use config::{
    load_agents, load_agents_from_str, load_tasks, load_tasks_from_str, ModelPolicy,
    PipelineSettings, TaskPlan, TemplateValues,
};
pub use error::{ErrorKind, Result, StudyFlowError};
pub use llm::{DynLlmClient, LlmClient, LlmRequest, LlmResponse, LlmSettings, LocalEchoClient};
#[cfg(feature = "openai-client")]
pub use llm::GenericHttpClient;
pub use output::{combine_markdown_files, write_record, CombineReport, RecordValue, ToRecord};
pub use pipeline::{PipelineExecutor, PipelineRun, RuntimeContext, TaskDescriptor, TaskOutput};
pub use quiz::QuizConfig;
pub use schema::{ExtractedInfo, Schema, SchemaKind, SchemaRegistry};
pub use utils::logging;
