//! The report agent capability
//!
//! An agent takes a [`ReportRequest`] and returns an untrusted
//! [`AgentPayload`]. The generator only depends on the [`ReportAgent`]
//! trait; [`LlmReportAgent`] is the production implementation.

pub mod llm_agent;
pub mod prompts;

pub use llm_agent::{AgentConfig, LlmReportAgent, extract_json};
pub use prompts::PromptLibrary;

use async_trait::async_trait;

use crate::domain::{AgentPayload, ReportRequest};
use crate::error::AgentError;

/// Something that can produce a structured report payload
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportAgent: Send + Sync {
    /// Request one report; every field of the answer is still unvetted
    async fn request_report(&self, request: &ReportRequest) -> Result<AgentPayload, AgentError>;
}
