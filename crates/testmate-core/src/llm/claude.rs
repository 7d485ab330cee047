use crate::constants::endpoints;
use crate::error::TestmateError;
use crate::llm::traits::*;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Client for the Anthropic Messages API.
pub struct ClaudeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ClaudeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: endpoints::CLAUDE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, TestmateError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TestmateError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    fn build_request_body(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                let content: Vec<Value> = m
                    .content
                    .iter()
                    .map(|block| serde_json::json!({ "type": "text", "text": block.text }))
                    .collect();
                serde_json::json!({
                    "role": m.role,
                    "content": content,
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": request.model,
            "max_tokens": request.config.max_tokens,
            "temperature": request.config.temperature,
            "messages": messages,
        });

        if !request.system.is_empty() {
            body["system"] = Value::String(request.system.clone());
        }

        body
    }
}

#[derive(Debug, Deserialize)]
struct ClaudeApiResponse {
    #[serde(default)]
    content: Vec<ClaudeContent>,
    usage: Option<ClaudeUsage>,
}

#[derive(Debug, Deserialize)]
struct ClaudeContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeUsage {
    input_tokens: u32,
    output_tokens: u32,
}

fn parse_response(body: &str) -> Result<LlmResponse, TestmateError> {
    let api_response: ClaudeApiResponse = serde_json::from_str(body)
        .map_err(|e| TestmateError::inference(format!("Failed to parse response: {e}")))?;

    let blocks: Vec<ContentBlock> = api_response
        .content
        .into_iter()
        .filter(|c| c.content_type == "text" && !c.text.trim().is_empty())
        .map(|c| ContentBlock::new(c.text))
        .collect();

    let message = if blocks.is_empty() {
        None
    } else {
        Some(Message::new(Role::Assistant, blocks))
    };

    Ok(LlmResponse {
        message,
        usage: api_response.usage.map(|u| Usage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        }),
    })
}

#[async_trait::async_trait]
impl LlmClient for ClaudeClient {
    async fn chat(&self, request: &ChatRequest) -> Result<LlmResponse, TestmateError> {
        let url = format!("{}/v1/messages", self.base_url);
        let request_body = self.build_request_body(request);

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending inference request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", endpoints::ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(TestmateError::inference)?;

        let status = response.status();
        let response_text = response.text().await.map_err(TestmateError::inference)?;

        if !status.is_success() {
            return Err(TestmateError::InferenceService(format!(
                "Claude API error ({}): {}",
                status, response_text
            )));
        }

        parse_response(&response_text)
    }
}
