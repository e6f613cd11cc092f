pub mod agent;
pub mod descriptor;
pub mod prompt;
pub mod registry;

pub use agent::LlmAgent;
pub use descriptor::AgentDescriptor;
pub use prompt::{ContextEntry, PromptBuilder};
pub use registry::{register_agent, AgentRegistry};
