//! Shared utilities for market-brief
//!
//! Logging setup and the small set of environment helpers the binary uses
//! to resolve credentials and run parameters.

pub mod env;
pub mod logging;

pub use env::{EnvError, env_parse, require_env, warn_if_missing};
pub use logging::{init_tracing, init_tracing_with};
