//! Chat-completion provider abstraction for market-brief
//!
//! This crate keeps the report pipeline independent of any particular
//! model vendor. It includes:
//!
//! - Message types for chat-style requests
//! - Completion request/response types with an optional JSON response mode
//! - The [`LLMProvider`] trait every backend implements
//! - An OpenAI-compatible backend (behind the `openai` feature), which also
//!   serves OpenRouter and local OpenAI-style servers

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, ResponseFormat, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "openai")]
pub mod providers;
