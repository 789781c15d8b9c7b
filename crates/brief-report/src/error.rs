//! Error types for report generation

use brief_llm::LLMError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a run before or after generation
///
/// Nothing in here is raised for a single bad agent answer; those become
/// unavailable sections instead.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Ticker symbol failed validation
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Placeholder pattern failed to compile
    #[error("Invalid placeholder pattern: {0}")]
    PatternError(#[from] regex::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Failure of a single agent call
#[derive(Debug, Error)]
pub enum AgentError {
    /// The chat-completion provider failed (transport, auth, timeout, ...)
    #[error("LLM provider error: {0}")]
    Provider(#[from] LLMError),

    /// The agent answered with no content
    #[error("Agent returned an empty response")]
    EmptyResponse,

    /// The answer hit the token limit and is incomplete
    #[error("Agent response was truncated at the token limit")]
    Truncated,

    /// The provider withheld the answer
    #[error("Agent response was withheld by the content filter")]
    Refused,

    /// The answer is not a JSON object
    #[error("Agent response is not a JSON object: {0}")]
    MalformedJson(String),

    /// Prompt template failed to render
    #[error("Prompt rendering failed: {0}")]
    Prompt(#[from] minijinja::Error),
}

impl AgentError {
    /// Whether the call never produced an answer to vet
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Provider(e) if e.is_transport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::InvalidTicker("$$$".to_string());
        assert_eq!(err.to_string(), "Invalid ticker: $$$");

        let err = ReportError::Io {
            path: PathBuf::from("reports/news.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "I/O error at reports/news.md: denied");
    }

    #[test]
    fn test_agent_error_conversion() {
        let err: AgentError = LLMError::Timeout(30).into();
        assert!(matches!(err, AgentError::Provider(LLMError::Timeout(30))));
        assert_eq!(err.to_string(), "LLM provider error: Request timed out after 30s");
        assert!(err.is_transport());
        assert!(!AgentError::Truncated.is_transport());
    }
}
