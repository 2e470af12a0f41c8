//! Error types for bistro
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in bistro
#[derive(Debug, Error)]
pub enum BistroError {
    /// Missing or invalid configuration (credentials, endpoints)
    #[error("Config error: {0}")]
    Config(String),

    /// The mapping service answered with a non-success status or an
    /// incomplete response (e.g. a 202 without a Location header)
    #[error("Remote error {status}: {body}")]
    Remote { status: u16, body: String },

    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Tool argument or dispatch error
    #[error("Tool error: {0}")]
    Tool(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for bistro operations
pub type Result<T> = std::result::Result<T, BistroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = BistroError::Config("AZURE_SUBSCRIPTION_KEY not set".to_string());
        assert_eq!(err.to_string(), "Config error: AZURE_SUBSCRIPTION_KEY not set");
    }

    #[test]
    fn test_remote_error_carries_status_and_body() {
        let err = BistroError::Remote {
            status: 403,
            body: "subscription key rejected".to_string(),
        };
        assert_eq!(err.to_string(), "Remote error 403: subscription key rejected");
    }

    #[test]
    fn test_llm_error() {
        let err = BistroError::Llm("rate limited".to_string());
        assert_eq!(err.to_string(), "LLM error: rate limited");
    }

    #[test]
    fn test_tool_error() {
        let err = BistroError::Tool("missing 'query' parameter".to_string());
        assert_eq!(err.to_string(), "Tool error: missing 'query' parameter");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BistroError = io_err.into();
        assert!(matches!(err, BistroError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: BistroError = json_err.into();
        assert!(matches!(err, BistroError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(BistroError::Config("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
