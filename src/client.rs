use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmSettings;
use crate::error::PipelineError;

/// One chat-completions round trip. Implementations keep no conversation
/// state between calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, PipelineError>;
}

pub type DynLlmClient = dyn LlmClient;

/// reqwest-backed client for OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub struct AIClient {
    http: Client,
    base_url: String,
    api_key: String,
    user_agent: String,
}

impl AIClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, PipelineError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| {
                PipelineError::Configuration(format!("Failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            user_agent: settings.user_agent.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmClient for AIClient {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, PipelineError> {
        let url = self.endpoint();
        debug!(
            %url,
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = ?request.max_tokens,
            structured = request.response_format.is_some(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("User-Agent", &self.user_agent)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                PipelineError::transport(format!(
                    "Failed to send request to chat completions endpoint: {err}"
                ))
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "chat completion response received");

        match status {
            StatusCode::OK => response.json::<ChatCompletionResponse>().await.map_err(|err| {
                PipelineError::http(
                    status.as_u16(),
                    format!("Failed to parse chat completion response JSON: {err}"),
                )
            }),
            StatusCode::TOO_MANY_REQUESTS => {
                let body = response.text().await.unwrap_or_default();
                Err(PipelineError::http(
                    status.as_u16(),
                    format!("Rate limit exceeded. Please wait before trying again. (API response: {body})"),
                ))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PipelineError::http(
                status.as_u16(),
                "Invalid API key. Please check your API key configuration.",
            )),
            StatusCode::BAD_REQUEST => {
                let body = response.text().await.unwrap_or_default();
                Err(PipelineError::http(
                    status.as_u16(),
                    format!("Invalid request: {body}"),
                ))
            }
            StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE => Err(PipelineError::http(
                status.as_u16(),
                "Service is temporarily unavailable. Please try again later.",
            )),
            other => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(PipelineError::http(
                    other.as_u16(),
                    format!("API error: {body}"),
                ))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatMessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatMessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatMessageRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMessageRole {
    System,
    User,
}

/// Structured-output request understood by OpenAI-compatible providers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonSchema { json_schema: JsonSchemaFormat },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub schema: serde_json::Value,
    pub strict: bool,
}

impl ResponseFormat {
    pub fn json_schema(name: impl Into<String>, schema: serde_json::Value) -> Self {
        ResponseFormat::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: name.into(),
                schema,
                strict: true,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatChoice {
    /// The provider stopped because the completion budget ran out.
    pub fn was_truncated(&self) -> bool {
        self.finish_reason.as_deref() == Some("length")
    }
}

impl ChatCompletionResponse {
    /// Trimmed text of the first choice, if it has any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn settings(base_url: String) -> LlmSettings {
        LlmSettings {
            provider: crate::config::LlmProvider::Gemini,
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            base_url,
            user_agent: "planwright/test".to_string(),
        }
    }

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "gemini-2.0-flash".to_string(),
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
            max_tokens: Some(128),
            temperature: Some(0.2),
            response_format: Some(ResponseFormat::json_schema(
                "CodingPlan",
                json!({"type": "object"}),
            )),
        }
    }

    #[tokio::test]
    async fn sends_bearer_auth_and_structured_format() {
        let server = MockServer::start_async().await;

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("Authorization", "Bearer test-key")
                    .header("User-Agent", "planwright/test")
                    .json_body(json!({
                        "model": "gemini-2.0-flash",
                        "messages": [
                            {"role": "system", "content": "be brief"},
                            {"role": "user", "content": "hi"}
                        ],
                        "max_tokens": 128,
                        "temperature": 0.2,
                        "response_format": {
                            "type": "json_schema",
                            "json_schema": {
                                "name": "CodingPlan",
                                "schema": {"type": "object"},
                                "strict": true
                            }
                        }
                    }));

                then.status(200).json_body(json!({
                    "choices": [
                        {
                            "index": 0,
                            "finish_reason": "stop",
                            "message": { "role": "assistant", "content": "  hello  " }
                        }
                    ]
                }));
            })
            .await;

        let client = AIClient::new(&settings(server.url("/v1/"))).unwrap();
        let response = client.chat_completion(request()).await.unwrap();

        assert_eq!(response.first_text(), Some("hello"));
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_maps_to_transport_failure() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(401).body("nope");
            })
            .await;

        let client = AIClient::new(&settings(server.url("/v1"))).unwrap();
        let err = client.chat_completion(request()).await.unwrap_err();

        match err {
            PipelineError::Transport { status, message } => {
                assert_eq!(status, Some(401));
                assert!(message.contains("Invalid API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rate_limit_includes_provider_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(429).body("quota exhausted");
            })
            .await;

        let client = AIClient::new(&settings(server.url("/v1"))).unwrap();
        let err = client.chat_completion(request()).await.unwrap_err();

        assert_eq!(
            err,
            PipelineError::http(
                429,
                "Rate limit exceeded. Please wait before trying again. (API response: quota exhausted)"
            )
        );
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(503);
            })
            .await;

        let client = AIClient::new(&settings(server.url("/v1"))).unwrap();
        assert!(client.chat_completion(request()).await.is_err());
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn null_content_yields_no_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({
                    "choices": [{ "finish_reason": "length", "message": { "role": "assistant", "content": null } }]
                }));
            })
            .await;

        let client = AIClient::new(&settings(server.url("/v1"))).unwrap();
        let response = client.chat_completion(request()).await.unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn request_omits_unset_options() {
        let request = ChatCompletionRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::user("hi")],
            max_tokens: None,
            temperature: None,
            response_format: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"model": "m", "messages": [{"role": "user", "content": "hi"}]})
        );
    }
}
