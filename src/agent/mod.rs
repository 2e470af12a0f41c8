//! Conversation agent loop
//!
//! Drives one chat turn at a time: send the transcript to the LLM, execute
//! any tool calls it requests through the registry, feed the results back,
//! and repeat until the model answers with plain text or the consecutive
//! auto-reply budget is spent. The turn is over for good when the reply,
//! right-trimmed, ends with the termination token.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::llm::{ChatRequest, FinishReason, LlmClient, Message};
use crate::tools::ToolRegistry;

/// Token a finished assistant reply ends with
pub const TERMINATION_TOKEN: &str = "TERMINATE";

/// Default system prompt, matching the tool-only protocol the tools expect
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "For geo location tasks, only use the functions you have been provided with. \
     Reply TERMINATE when the task is done.";

/// Check whether an assistant reply closes the conversation
pub fn is_termination_message(content: &str) -> bool {
    content.trim_end().ends_with(TERMINATION_TOKEN)
}

/// Assistant content with a trailing termination token stripped, for display
pub fn display_content(content: &str) -> &str {
    content.trim_end().trim_end_matches(TERMINATION_TOKEN).trim_end()
}

/// One renderable step of a conversation turn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    Assistant { content: String },
    ToolCall { name: String, arguments: Value },
    ToolResult { name: String, content: String, is_error: bool },
}

/// Everything a front end needs to render one turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    pub events: Vec<ChatEvent>,
    pub terminated: bool,
}

impl TurnReport {
    /// Last assistant text of the turn, empty when the model said nothing
    pub fn reply(&self) -> &str {
        self.events
            .iter()
            .rev()
            .find_map(|event| match event {
                ChatEvent::Assistant { content } => Some(content.as_str()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// Tunables for the agent loop
#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub system_prompt: String,
    /// Maximum consecutive tool-execution rounds per turn
    pub max_auto_replies: u32,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_auto_replies: 2,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Runs conversation turns against an LLM with a registered tool set
pub struct AgentRunner {
    llm: Arc<dyn LlmClient>,
    registry: ToolRegistry,
    options: AgentOptions,
}

impl AgentRunner {
    pub fn new(llm: Arc<dyn LlmClient>, registry: ToolRegistry, options: AgentOptions) -> Self {
        Self {
            llm,
            registry,
            options,
        }
    }

    /// Model identifier, for display
    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Names of the registered tools, for display
    pub fn tool_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    fn build_request(&self, history: &[Message]) -> ChatRequest {
        let mut request = ChatRequest::new(self.options.system_prompt.as_str())
            .with_messages(history.iter().cloned())
            .with_tools(self.registry.definitions());
        if let Some(temperature) = self.options.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.options.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }

    /// Run one user turn, mutating `history` in place
    ///
    /// `history` holds the transcript without the system message; the
    /// system prompt is prepended on every request.
    pub async fn run_turn(&self, history: &mut Vec<Message>, user_input: &str) -> Result<TurnReport> {
        history.push(Message::user(user_input));

        let mut events = Vec::new();
        let mut tool_rounds = 0u32;

        loop {
            let response = self.llm.complete(self.build_request(history)).await?;

            let wants_tools =
                response.finish_reason == FinishReason::ToolCalls && !response.tool_calls.is_empty();

            if wants_tools && tool_rounds < self.options.max_auto_replies {
                tool_rounds += 1;

                if !response.content.is_empty() {
                    events.push(ChatEvent::Assistant {
                        content: response.content.clone(),
                    });
                }
                history.push(Message::assistant_with_tools(
                    response.content.clone(),
                    response.tool_calls.clone(),
                ));

                for call in &response.tool_calls {
                    log::debug!("dispatching tool '{}' with {}", call.name, call.arguments);
                    events.push(ChatEvent::ToolCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    });

                    let outcome = self.registry.dispatch(call).await;
                    if outcome.is_error {
                        log::warn!("tool '{}' failed: {}", call.name, outcome.content);
                    }
                    events.push(ChatEvent::ToolResult {
                        name: call.name.clone(),
                        content: outcome.content.clone(),
                        is_error: outcome.is_error,
                    });
                    history.push(Message::tool_result(call.id.as_str(), outcome.content));
                }

                continue;
            }

            if wants_tools {
                // Budget spent: record the reply without executing the calls
                log::warn!(
                    "tool budget exhausted after {} rounds, ignoring further calls",
                    tool_rounds
                );
            }

            let terminated = is_termination_message(&response.content);
            if !response.content.is_empty() {
                events.push(ChatEvent::Assistant {
                    content: response.content.clone(),
                });
            }
            history.push(Message::assistant(response.content));

            return Ok(TurnReport { events, terminated });
        }
    }
}
