//! OpenAI-compatible chat-completions client
//!
//! Talks to any endpoint implementing the `POST {base}/chat/completions`
//! function-calling protocol, which covers the hosted OpenAI API and the
//! Azure OpenAI deployments the original assistant ran against.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::{BistroError, Result};
use crate::llm::client::LlmClient;
use crate::llm::types::{ChatRequest, ChatResponse, FinishReason, Message, Role, ToolCall, Usage};

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model when no config list names one
const DEFAULT_MODEL: &str = "gpt-4o";

/// Outer inference timeout (matches the original's 120 s agent config)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for the OpenAI client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: None,
            max_tokens: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl OpenAiConfig {
    /// Create a config with a specific model
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// OpenAI-compatible API client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a client with an explicit API key
    ///
    /// An empty key is a config error raised before any request exists.
    pub fn new(api_key: impl Into<String>, config: OpenAiConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(BistroError::Config("LLM API key must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(BistroError::Http)?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    /// Build the chat-completions request body
    fn build_request(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = request.messages.iter().map(message_to_wire).collect();

        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
        });

        if let Some(temperature) = request.temperature.or(self.config.temperature) {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens.or(self.config.max_tokens) {
            body["max_tokens"] = json!(max_tokens);
        }
        if !request.tools.is_empty() {
            let tools: Vec<Value> = request.tools.iter().map(|tool| tool.to_openai_schema()).collect();
            body["tools"] = json!(tools);
        }

        body
    }

    /// Parse the API response into a ChatResponse
    fn parse_response(&self, body: Value) -> Result<ChatResponse> {
        let choice = body["choices"]
            .get(0)
            .ok_or_else(|| BistroError::Llm("response contained no choices".to_string()))?;
        let message = &choice["message"];

        let content = message["content"].as_str().unwrap_or_default().to_string();

        let mut tool_calls = Vec::new();
        if let Some(calls) = message["tool_calls"].as_array() {
            for call in calls {
                let id = call["id"].as_str().unwrap_or_default().to_string();
                let name = call["function"]["name"].as_str().unwrap_or_default().to_string();
                let raw_arguments = call["function"]["arguments"].as_str().unwrap_or("{}");
                let arguments: Value = serde_json::from_str(raw_arguments).map_err(|e| {
                    BistroError::Llm(format!("tool call '{}' carried invalid JSON arguments: {}", name, e))
                })?;
                tool_calls.push(ToolCall::new(id, name, arguments));
            }
        }

        let finish_reason = FinishReason::from_wire(choice["finish_reason"].as_str());

        let usage = if let Some(usage) = body.get("usage") {
            Usage::new(
                usage["prompt_tokens"].as_u64().unwrap_or(0),
                usage["completion_tokens"].as_u64().unwrap_or(0),
            )
        } else {
            Usage::default()
        };

        Ok(ChatResponse {
            content,
            tool_calls,
            finish_reason,
            usage,
        })
    }

    /// Send a request to the chat-completions endpoint
    async fn send_request(&self, body: Value) -> Result<Value> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BistroError::Llm(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            let message = extract_error_message(&error_body).unwrap_or(error_body);
            return Err(BistroError::Llm(format!("API error {}: {}", status, message)));
        }

        response
            .json()
            .await
            .map_err(|e| BistroError::Llm(format!("failed to parse response: {}", e)))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let body = self.build_request(&request);
        let response = self.send_request(body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

/// Convert one transcript message to the wire shape
fn message_to_wire(message: &Message) -> Value {
    let mut wire = json!({
        "role": message.role.as_str(),
    });

    // Assistant messages that only carry tool calls have null content
    if message.content.is_empty() && message.role == Role::Assistant && !message.tool_calls.is_empty() {
        wire["content"] = Value::Null;
    } else {
        wire["content"] = json!(message.content);
    }

    if !message.tool_calls.is_empty() {
        let calls: Vec<Value> = message
            .tool_calls
            .iter()
            .map(|call| {
                json!({
                    "id": call.id,
                    "type": "function",
                    "function": {
                        "name": call.name,
                        "arguments": call.arguments.to_string(),
                    }
                })
            })
            .collect();
        wire["tool_calls"] = json!(calls);
    }

    if let Some(tool_call_id) = &message.tool_call_id {
        wire["tool_call_id"] = json!(tool_call_id);
    }

    wire
}

/// Pull the message out of an OpenAI error envelope, if the body is one
fn extract_error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed["error"]["message"].as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ToolDefinition;

    fn test_client() -> OpenAiClient {
        OpenAiClient::new("test-key", OpenAiConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_api_key_is_config_error() {
        let result = OpenAiClient::new("", OpenAiConfig::default());
        assert!(matches!(result, Err(BistroError::Config(_))));
    }

    #[test]
    fn test_config_default() {
        let config = OpenAiConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_config_with_model() {
        let config = OpenAiConfig::with_model("gpt-4o-mini");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_build_request_basic() {
        let client = test_client();
        let request = ChatRequest::new("You are helpful").with_message(Message::user("Hello"));

        let body = client.build_request(&request);

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are helpful");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Hello");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_build_request_with_tools() {
        let client = test_client();
        let tool = ToolDefinition::new(
            "geolocation",
            "Geolocation assistant.",
            json!({
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            }),
        );
        let request = ChatRequest::new("sys")
            .with_message(Message::user("Where is Haarlem?"))
            .with_tools(vec![tool]);

        let body = client.build_request(&request);

        assert!(body["tools"].is_array());
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "geolocation");
    }

    #[test]
    fn test_build_request_sampling_overrides() {
        let client = test_client();
        let request = ChatRequest::new("sys")
            .with_message(Message::user("hi"))
            .with_temperature(0.5)
            .with_max_tokens(256);

        let body = client.build_request(&request);
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["max_tokens"], 256);
    }

    #[test]
    fn test_build_request_tool_results_round() {
        let client = test_client();
        let call = ToolCall::new("call_1", "geolocation", json!({"query": "Haarlem"}));
        let request = ChatRequest::new("sys")
            .with_message(Message::user("Where is Haarlem?"))
            .with_message(Message::assistant_with_tools("", vec![call]))
            .with_message(Message::tool_result("call_1", "{\"results\": []}"));

        let body = client.build_request(&request);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);

        let assistant = &messages[2];
        assert!(assistant["content"].is_null());
        assert_eq!(assistant["tool_calls"][0]["id"], "call_1");
        assert_eq!(assistant["tool_calls"][0]["type"], "function");
        // Arguments go over the wire as a JSON string
        assert_eq!(
            assistant["tool_calls"][0]["function"]["arguments"],
            "{\"query\":\"Haarlem\"}"
        );

        let tool = &messages[3];
        assert_eq!(tool["role"], "tool");
        assert_eq!(tool["tool_call_id"], "call_1");
    }

    #[test]
    fn test_parse_response_text_only() {
        let client = test_client();
        let api_response = json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Haarlem is in the Netherlands. TERMINATE"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 10}
        });

        let response = client.parse_response(api_response).unwrap();
        assert_eq!(response.content, "Haarlem is in the Netherlands. TERMINATE");
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage, Usage::new(20, 10));
    }

    #[test]
    fn test_parse_response_with_tool_calls() {
        let client = test_client();
        let api_response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "restaurant",
                            "arguments": "{\"latitude\": 52.38, \"longitude\": 4.64, \"category_id\": \"7315036\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let response = client.parse_response(api_response).unwrap();
        assert!(response.content.is_empty());
        assert_eq!(response.finish_reason, FinishReason::ToolCalls);
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].id, "call_abc");
        assert_eq!(response.tool_calls[0].name, "restaurant");
        assert_eq!(response.tool_calls[0].arguments["latitude"], 52.38);
        assert_eq!(response.tool_calls[0].arguments["category_id"], "7315036");
    }

    #[test]
    fn test_parse_response_invalid_tool_arguments() {
        let client = test_client();
        let api_response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_bad",
                        "type": "function",
                        "function": {"name": "restaurant", "arguments": "{not json"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let result = client.parse_response(api_response);
        assert!(matches!(result, Err(BistroError::Llm(_))));
    }

    #[test]
    fn test_parse_response_no_choices() {
        let client = test_client();
        let result = client.parse_response(json!({"choices": []}));
        assert!(matches!(result, Err(BistroError::Llm(_))));
    }

    #[test]
    fn test_parse_response_finish_reasons() {
        let client = test_client();
        for (wire, expected) in [
            ("stop", FinishReason::Stop),
            ("tool_calls", FinishReason::ToolCalls),
            ("length", FinishReason::Length),
            ("content_filter", FinishReason::Other),
        ] {
            let api_response = json!({
                "choices": [{"message": {"content": ""}, "finish_reason": wire}]
            });
            let response = client.parse_response(api_response).unwrap();
            assert_eq!(response.finish_reason, expected);
        }
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error": {"message": "invalid api key", "type": "invalid_request_error"}}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("invalid api key"));
        assert!(extract_error_message("plain text").is_none());
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let client = test_client();
        let debug = format!("{:?}", client);
        assert!(debug.contains("OpenAiClient"));
        assert!(!debug.contains("test-key"));
    }
}
