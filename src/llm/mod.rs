pub mod client;
pub mod config;
pub mod echo;
pub mod factory;
pub mod http;
pub mod provider;
pub mod types;

pub use client::{DynLlmClient, LlmClient};
pub use config::LlmSettings;
pub use echo::LocalEchoClient;
pub use factory::LlmClientFactory;
#[cfg(feature = "openai-client")]
pub use http::GenericHttpClient;
pub use provider::Provider;
pub use types::{LlmMessage, LlmRequest, LlmResponse};
