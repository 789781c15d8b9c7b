//! Domain types shared by the agents, guardrails and the generator

pub mod kind;
pub mod lenient;
pub mod payload;
pub mod request;
pub mod ticker;

pub use kind::ReportKind;
pub use payload::AgentPayload;
pub use request::{ReportRequest, Subject};
pub use ticker::Ticker;
