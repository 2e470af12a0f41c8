//! Tool system for LLM function calling
//!
//! The four assistant tools wrap the category table and the Azure Maps
//! client. Each tool renders its result as a string the agent can feed
//! back into the conversation; failures become error text, never a crash.

mod category;
mod distance;
mod geolocation;
mod registry;
mod restaurant;

pub use category::RestaurantCategoryTool;
pub use distance::RestaurantDistanceTool;
pub use geolocation::GeolocationTool;
pub use registry::ToolRegistry;
pub use restaurant::RestaurantTool;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{BistroError, Result};
use crate::llm::ToolDefinition;

/// A tool that can be called by the LLM
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the LLM tool-call name)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool, returning the rendered result string
    async fn execute(&self, args: Value) -> Result<String>;

    /// Descriptor advertised to the LLM
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}

/// Result of dispatching a tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// Extract a required string argument
fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args[key]
        .as_str()
        .ok_or_else(|| BistroError::Tool(format!("missing '{}' parameter", key)))
}

/// Extract a required number argument
fn require_f64(args: &Value, key: &str) -> Result<f64> {
    args[key]
        .as_f64()
        .ok_or_else(|| BistroError::Tool(format!("missing '{}' parameter", key)))
}

/// Category ids may arrive as a JSON string or number
fn category_id_arg(args: &Value, key: &str) -> Result<String> {
    match &args[key] {
        Value::String(id) => Ok(id.clone()),
        Value::Number(id) => Ok(id.to_string()),
        _ => Err(BistroError::Tool(format!("missing '{}' parameter", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_outcome_success() {
        let outcome = ToolOutcome::success("done");
        assert_eq!(outcome.content, "done");
        assert!(!outcome.is_error);
    }

    #[test]
    fn test_tool_outcome_error() {
        let outcome = ToolOutcome::error("boom");
        assert!(outcome.is_error);
    }

    #[test]
    fn test_require_str() {
        let args = json!({"query": "Haarlem"});
        assert_eq!(require_str(&args, "query").unwrap(), "Haarlem");
        assert!(require_str(&args, "missing").is_err());
        assert!(require_str(&json!({"query": 7}), "query").is_err());
    }

    #[test]
    fn test_require_f64() {
        let args = json!({"latitude": 52.38});
        assert_eq!(require_f64(&args, "latitude").unwrap(), 52.38);
        assert!(require_f64(&args, "longitude").is_err());
    }

    #[test]
    fn test_category_id_arg_accepts_string_or_number() {
        assert_eq!(category_id_arg(&json!({"category_id": "7315"}), "category_id").unwrap(), "7315");
        assert_eq!(category_id_arg(&json!({"category_id": 7315}), "category_id").unwrap(), "7315");
        assert!(category_id_arg(&json!({}), "category_id").is_err());
    }
}
