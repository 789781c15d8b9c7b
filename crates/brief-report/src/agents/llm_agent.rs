//! Report agent backed by a chat-completion provider

use async_trait::async_trait;
use brief_llm::{CompletionRequest, LLMProvider, Message, StopReason};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{PromptLibrary, ReportAgent};
use crate::config::GuardrailConfig;
use crate::domain::{AgentPayload, ReportRequest};
use crate::error::AgentError;

/// Model parameters for the report agent
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Model identifier as the provider knows it
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    /// News lookback mentioned in the prompt
    pub news_window_days: u32,
    /// Insider filing lookback mentioned in the prompt
    pub insider_window_days: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "openai/gpt-4o-mini".to_string(),
            max_tokens: 4096,
            temperature: 0.2,
            news_window_days: 120,
            insider_window_days: 365,
        }
    }
}

impl AgentConfig {
    /// Use a specific model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Ask for the same lookback windows the guardrails enforce
    pub fn with_windows(mut self, guardrails: &GuardrailConfig) -> Self {
        self.news_window_days = guardrails.news_max_age_days;
        self.insider_window_days = guardrails.insider_max_age_days;
        self
    }
}

/// Report agent that prompts an LLM for a JSON answer
pub struct LlmReportAgent {
    provider: Arc<dyn LLMProvider>,
    prompts: PromptLibrary,
    config: AgentConfig,
}

impl LlmReportAgent {
    pub fn new(provider: Arc<dyn LLMProvider>, config: AgentConfig) -> Result<Self, AgentError> {
        Ok(Self {
            provider,
            prompts: PromptLibrary::new()?,
            config,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

#[async_trait]
impl ReportAgent for LlmReportAgent {
    #[instrument(skip_all, fields(kind = %request.kind, subject = %request.subject))]
    async fn request_report(&self, request: &ReportRequest) -> Result<AgentPayload, AgentError> {
        let prompt = self.prompts.render(
            request,
            self.config.news_window_days,
            self.config.insider_window_days,
        )?;

        let completion = CompletionRequest::builder(&self.config.model)
            .system(self.prompts.system())
            .add_message(Message::user(prompt))
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .json_output()
            .build();

        let response = self.provider.complete(completion).await?;
        debug!(
            provider = self.provider.name(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Agent answered"
        );

        match response.stop_reason {
            StopReason::MaxTokens => return Err(AgentError::Truncated),
            StopReason::ContentFilter => return Err(AgentError::Refused),
            StopReason::EndTurn | StopReason::StopSequence => {}
        }

        let text = response.message.text().ok_or(AgentError::EmptyResponse)?;
        let body = extract_json(text)?;
        Ok(AgentPayload::new(request.kind, body))
    }
}

/// Pull the JSON object out of a model answer
///
/// Models sometimes wrap the object in a Markdown fence or a sentence of
/// prose; everything outside the outermost braces is ignored.
pub fn extract_json(text: &str) -> Result<Value, AgentError> {
    let trimmed = text.trim();

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) else {
        return Err(AgentError::MalformedJson(preview(trimmed)));
    };
    if end <= start {
        return Err(AgentError::MalformedJson(preview(trimmed)));
    }

    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(AgentError::MalformedJson(preview(trimmed))),
        Err(e) => Err(AgentError::MalformedJson(e.to_string())),
    }
}

fn preview(text: &str) -> String {
    let head: String = text.chars().take(80).collect();
    if head.len() < text.len() {
        format!("{head}...")
    } else {
        head
    }
}
