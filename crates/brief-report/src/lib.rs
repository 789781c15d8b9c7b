//! Guarded market report generation
//!
//! This crate asks a generative agent for structured market reports and
//! refuses to pass along anything it cannot vouch for. It includes:
//!
//! - Domain types for tickers, report kinds and agent requests
//! - Guardrails: range clamps, staleness windows, placeholder detection and
//!   direction consistency checks
//! - Markdown formatting and one section renderer per report kind
//! - The `ReportAgent` capability and an LLM-backed implementation
//! - A generator that fans out five reports per ticker, then requests the
//!   cross-ticker market conditions report
//!
//! # Example
//!
//! ```rust,ignore
//! use brief_report::{
//!     AgentConfig, Guardrails, GuardrailConfig, LlmReportAgent, ReportGenerator, RunConfig,
//! };
//! use std::sync::Arc;
//!
//! let provider = Arc::new(/* an LLMProvider */);
//! let agent = Arc::new(LlmReportAgent::new(provider, AgentConfig::default())?);
//! let generator = ReportGenerator::new(agent, Guardrails::new(GuardrailConfig::default())?);
//!
//! let run = RunConfig::builder().build()?;
//! let reports = generator.generate(&run).await;
//! reports.write_all(&run.output_dir).await?;
//! ```

pub mod agents;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod format;
pub mod guardrails;
pub mod sections;

pub use agents::{AgentConfig, LlmReportAgent, ReportAgent};
pub use config::{DEFAULT_TICKERS, GuardrailConfig, RunConfig, RunConfigBuilder, default_tickers};
pub use domain::{AgentPayload, ReportKind, ReportRequest, Subject, Ticker};
pub use engine::{ReportBundle, ReportGenerator, ReportSet};
pub use error::{AgentError, ReportError, Result};
pub use guardrails::{Guardrails, Outcome, RangeRule, Rejection};
pub use sections::{ReportSection, SectionBody, UNAVAILABLE_MARKER};
