use async_trait::async_trait;

use crate::error::Result;
use super::client::LlmClient;
use super::types::{LlmRequest, LlmResponse};

/// 本地回显客户端，不访问网络，用于 `--dry-run`
///
/// 请求带有 `response_schema` 时返回符合该 schema 的占位 JSON。
#[derive(Default, Clone)]
pub struct LocalEchoClient;

#[async_trait]
impl LlmClient for LocalEchoClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        if let Some(schema) = &request.response_schema {
            return Ok(LlmResponse::text(schema.placeholder().to_string()));
        }
        Ok(LlmResponse::text(format!("[Echo] {}", request.user)))
    }

    fn model(&self) -> &str {
        "echo"
    }
}
