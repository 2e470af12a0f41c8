//! LLM client trait and mock implementation

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{BistroError, Result};
use crate::llm::types::{ChatRequest, ChatResponse};

/// Stateless LLM client: each call carries the full transcript
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request (blocking until complete)
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Model identifier used for display
    fn model(&self) -> &str;
}

/// Scripted client for tests: replays queued responses in order and
/// records every request it receives
pub struct MockLlmClient {
    responses: Mutex<VecDeque<ChatResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockLlmClient {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of scripted responses not yet consumed
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BistroError::Llm("mock client ran out of scripted responses".to_string()))
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::Message;

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mock = MockLlmClient::new(vec![ChatResponse::text("first"), ChatResponse::text("second")]);

        let first = mock.complete(ChatRequest::new("sys")).await.unwrap();
        let second = mock.complete(ChatRequest::new("sys")).await.unwrap();
        assert_eq!(first.content, "first");
        assert_eq!(second.content, "second");
        assert_eq!(mock.remaining(), 0);
    }

    #[tokio::test]
    async fn test_mock_errors_when_exhausted() {
        let mock = MockLlmClient::new(Vec::new());
        let result = mock.complete(ChatRequest::new("sys")).await;
        assert!(matches!(result, Err(BistroError::Llm(_))));
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let mock = MockLlmClient::new(vec![ChatResponse::text("ok")]);
        let request = ChatRequest::new("sys").with_message(Message::user("hello"));
        mock.complete(request).await.unwrap();

        let seen = mock.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].messages[1].content, "hello");
    }

    #[test]
    fn test_mock_model_name() {
        let mock = MockLlmClient::new(Vec::new());
        assert_eq!(mock.model(), "mock-model");
    }
}
