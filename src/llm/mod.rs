//! LLM client layer
//!
//! This module provides:
//! - Message and completion types for LLM communication
//! - LlmClient trait for API abstraction
//! - OpenAiClient implementation (chat-completions function calling)
//! - MockLlmClient for scripted tests

pub mod client;
pub mod openai;
pub mod types;

pub use client::{LlmClient, MockLlmClient};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use types::{
    ChatRequest, ChatResponse, FinishReason, Message, Role, ToolCall, ToolDefinition, Usage,
};
