use async_trait::async_trait;
use anyhow::anyhow;
use serde_json::{json, Value};
use tracing::instrument;

use crate::error::{Result, StudyFlowError};
use crate::llm::client::LlmClient;
use crate::llm::types::{LlmRequest, LlmResponse};

const MAX_ERROR_BODY: usize = 500;

#[derive(Clone)]
pub struct GenericHttpClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl GenericHttpClient {
    /// 创建 HTTP 客户端
    ///
    /// 连接超时 10 秒，单次请求最长 300 秒
    fn build_client() -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| StudyFlowError::Other(anyhow!("failed to build HTTP client: {}", e)))
    }

    pub fn new<S1, S2>(endpoint: S1, api_key: Option<String>, model: S2) -> Result<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Ok(Self {
            client: Self::build_client()?,
            endpoint: endpoint.into(),
            api_key,
            model: model.into(),
        })
    }

    fn completions_url(&self) -> String {
        if self.endpoint.ends_with("/chat/completions") {
            self.endpoint.clone()
        } else {
            format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
        }
    }
}

fn truncate(text: &str) -> String {
    if text.len() <= MAX_ERROR_BODY {
        return text.to_string();
    }
    let mut cut = MAX_ERROR_BODY;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...(truncated, {} bytes total)", &text[..cut], text.len())
}

#[async_trait]
impl LlmClient for GenericHttpClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let mut body = json!({
            "model": self.model,
            "messages": request.messages(),
            "temperature": request.temperature,
        });
        if request.response_schema.is_some() {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let url = self.completions_url();
        let mut builder = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| StudyFlowError::Other(anyhow!("HTTP request error: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| StudyFlowError::Other(anyhow!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(StudyFlowError::Other(anyhow!(
                "Request failed with status {}: {}\nEndpoint: {}",
                status,
                truncate(&response_text),
                url
            )));
        }

        let payload: Value = serde_json::from_str(&response_text).map_err(|e| {
            StudyFlowError::Other(anyhow!(
                "Response parse error: {}\nResponse body: {}",
                e,
                truncate(&response_text)
            ))
        })?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                StudyFlowError::Other(anyhow!(
                    "Missing content in response: {}",
                    truncate(&payload.to_string())
                ))
            })?
            .to_string();

        tracing::debug!(bytes = content.len(), "completion received");

        Ok(LlmResponse {
            content,
            metadata: payload.get("usage").cloned(),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_is_appended_once() {
        let client = GenericHttpClient::new("https://openrouter.ai/api/v1/", None, "m").unwrap();
        assert_eq!(client.completions_url(), "https://openrouter.ai/api/v1/chat/completions");

        let client =
            GenericHttpClient::new("http://localhost:8080/v1/chat/completions", None, "m").unwrap();
        assert_eq!(client.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "é".repeat(400);
        let out = truncate(&text);
        assert!(out.contains("truncated"));
    }
}
