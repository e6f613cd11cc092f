//! HTTP 客户端实现模块
//!
//! `GenericHttpClient` 通过 OpenAI 兼容的 `/chat/completions` 接口调用各提供商。

#[cfg(feature = "openai-client")]
pub mod generic;

#[cfg(feature = "openai-client")]
pub use generic::GenericHttpClient;
