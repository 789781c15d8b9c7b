//! market-brief: guarded Markdown market reports for a ticker universe
//!
//! Usage:
//!   market-brief --tickers AAPL,MSFT --as-of 2025-06-30 --output-dir reports
//!
//! Requires `OPENROUTER_API_KEY`; values in a `.env` file are picked up.

mod settings;

use anyhow::Result;
use brief_llm::providers::{OpenAIConfig, OpenAIProvider};
use brief_report::{Guardrails, LlmReportAgent, ReportGenerator};
use clap::Parser;
use settings::{Args, OPTIONAL_CREDENTIALS};
use std::sync::Arc;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    brief_utils::init_tracing();

    let args = Args::parse();

    let api_key = brief_utils::require_env("OPENROUTER_API_KEY")?;
    for name in OPTIONAL_CREDENTIALS {
        brief_utils::warn_if_missing(name);
    }

    let run = settings::run_config(&args)?;
    let guardrail_config = settings::guardrail_config(&args)?;
    let agent_config = settings::agent_config(&args, &guardrail_config);
    let guardrails = Guardrails::new(guardrail_config)?;

    info!(
        tickers = run.tickers.len(),
        as_of = %run.as_of,
        model = %agent_config.model,
        "Starting market brief"
    );

    let mut provider_config = OpenAIConfig::openrouter(api_key)
        .with_timeout(args.timeout)
        .with_app_name("market-brief");
    if let Some(base) = args.api_base.as_deref().filter(|b| !b.trim().is_empty()) {
        provider_config = provider_config.with_api_base(base.trim());
    }
    let provider = Arc::new(OpenAIProvider::with_config(provider_config)?);
    let agent = Arc::new(LlmReportAgent::new(provider, agent_config)?);
    let generator = ReportGenerator::new(agent, guardrails);

    let reports = generator.generate(&run).await;
    let paths = reports.write_all(&run.output_dir).await?;

    println!("\n--- Analysis Complete ---");
    println!("Reports generated:");
    for path in &paths {
        println!("- {}", path.display());
    }

    let unavailable = reports.unavailable_count();
    if unavailable > 0 {
        println!("\n{unavailable} section(s) were unavailable; see the log for the reasons.");
    }

    Ok(())
}
