//! Command-line flags and their environment fallbacks

use anyhow::{Context, Result};
use brief_report::{AgentConfig, GuardrailConfig, RunConfig, Ticker, default_tickers};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

/// Credentials that only widen the agent's data sources
pub const OPTIONAL_CREDENTIALS: &[&str] = &["ALPACA_API_KEY", "ALPACA_SECRET_KEY", "FMP_API_KEY"];

#[derive(Parser, Debug)]
#[command(name = "market-brief")]
#[command(about = "Generate guarded market report bundles for a ticker universe", long_about = None)]
pub struct Args {
    /// Comma-separated tickers (defaults to the built-in universe)
    #[arg(long, env = "REPORT_TICKERS")]
    pub tickers: Option<String>,

    /// As-of date, YYYY-MM-DD (defaults to REPORT_AS_OF_DATE, then today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Benchmark ticker for price comparisons
    #[arg(long, env = "REPORT_BENCHMARK", default_value = "SPY")]
    pub benchmark: String,

    /// Lookback period
    #[arg(long, env = "REPORT_PERIOD", default_value = "1y")]
    pub period: String,

    /// Bar interval
    #[arg(long, env = "REPORT_INTERVAL", default_value = "1d")]
    pub interval: String,

    /// Directory the bundles are written to
    #[arg(long, default_value = "reports")]
    pub output_dir: PathBuf,

    /// JSON file overriding the default guardrail policy
    #[arg(long)]
    pub guardrails: Option<PathBuf>,

    /// Model identifier on OpenRouter
    #[arg(long, env = "OPENROUTER_MODEL")]
    pub model: Option<String>,

    /// OpenAI-compatible endpoint replacing OpenRouter
    #[arg(long, env = "OPENROUTER_API_BASE")]
    pub api_base: Option<String>,

    /// Maximum number of tickers processed at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// HTTP timeout for each agent call, in seconds
    #[arg(long, env = "OPENROUTER_TIMEOUT_SECS", default_value_t = 180)]
    pub timeout: u64,
}

/// As-of date: the flag, then `REPORT_AS_OF_DATE`, then `today`
///
/// An unparseable environment value is reported and ignored.
pub fn resolve_as_of(flag: Option<NaiveDate>, env_value: Option<&str>, today: NaiveDate) -> NaiveDate {
    if let Some(date) = flag {
        return date;
    }
    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("REPORT_AS_OF_DATE '{raw}' is invalid; using today's date instead");
            today
        }),
        None => today,
    }
}

/// Run parameters from flags and environment
pub fn run_config(args: &Args) -> Result<RunConfig> {
    let tickers = match args.tickers.as_deref().map(str::trim) {
        Some(list) if !list.is_empty() => Ticker::parse_list(list)?,
        _ => default_tickers(),
    };

    let env_as_of = std::env::var("REPORT_AS_OF_DATE").ok();
    let as_of = resolve_as_of(args.as_of, env_as_of.as_deref(), Local::now().date_naive());

    let mut builder = RunConfig::builder()
        .tickers(tickers)
        .as_of(as_of)
        .period(&args.period)
        .interval(&args.interval)
        .output_dir(&args.output_dir);

    builder = match args.benchmark.trim() {
        "" => builder.without_benchmark(),
        benchmark => builder.benchmark(benchmark),
    };
    if let Some(limit) = args.concurrency {
        builder = builder.max_concurrent_tickers(limit);
    }

    Ok(builder.build()?)
}

/// Guardrail policy: defaults or `--guardrails`, then environment overrides
pub fn guardrail_config(args: &Args) -> Result<GuardrailConfig> {
    let config = match &args.guardrails {
        Some(path) => GuardrailConfig::from_file(path)
            .with_context(|| format!("Failed to load guardrails from {}", path.display()))?,
        None => GuardrailConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Model parameters, asking for the windows the guardrails enforce
pub fn agent_config(args: &Args, guardrails: &GuardrailConfig) -> AgentConfig {
    let config = AgentConfig::default().with_windows(guardrails);
    match &args.model {
        Some(model) if !model.trim().is_empty() => config.with_model(model.trim()),
        _ => config,
    }
}
