//! Fan-out / fan-in report generation

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

use super::ReportSet;
use crate::agents::ReportAgent;
use crate::config::RunConfig;
use crate::domain::{ReportKind, ReportRequest, Ticker};
use crate::guardrails::Guardrails;
use crate::sections::{self, ReportSection, SectionContext};

/// Drives the report agent over a ticker universe
///
/// Per ticker, the five report kinds are requested concurrently. Tickers
/// run as an ordered stream, optionally capped by
/// [`RunConfig::max_concurrent_tickers`]. The market conditions report is
/// requested only once every per-ticker call has resolved.
pub struct ReportGenerator {
    agent: Arc<dyn ReportAgent>,
    guardrails: Guardrails,
}

impl ReportGenerator {
    pub fn new(agent: Arc<dyn ReportAgent>, guardrails: Guardrails) -> Self {
        Self { agent, guardrails }
    }

    /// Generate every bundle for the run
    ///
    /// Never fails: each (ticker, kind) slot is filled with either content
    /// or the unavailable marker.
    pub async fn generate(&self, run: &RunConfig) -> ReportSet {
        info!(
            tickers = run.tickers.len(),
            as_of = %run.as_of,
            concurrency = run.concurrency(),
            "Starting report generation"
        );

        let per_ticker: Vec<Vec<ReportSection>> = stream::iter(&run.tickers)
            .map(|ticker| self.ticker_sections(ticker, run))
            .buffered(run.concurrency())
            .collect()
            .await;

        // every per-ticker call has resolved at this point
        info!("Generating market conditions report");
        let market = self.section(ReportRequest::market_conditions(run)).await;

        let mut set = ReportSet::new(run.as_of);
        for section in per_ticker.into_iter().flatten() {
            set.push(section);
        }
        set.push(market);

        info!(
            unavailable = set.unavailable_count(),
            "Report generation complete"
        );
        set
    }

    async fn ticker_sections(&self, ticker: &Ticker, run: &RunConfig) -> Vec<ReportSection> {
        info!("Generating reports for: {ticker}");
        let request = |kind| ReportRequest::for_ticker(kind, ticker, run);

        let (historical, volatility, news, insider, sentiment) = tokio::join!(
            self.section(request(ReportKind::Historical)),
            self.section(request(ReportKind::Volatility)),
            self.section(request(ReportKind::News)),
            self.section(request(ReportKind::Insider)),
            self.section(request(ReportKind::Sentiment)),
        );
        let sections = vec![historical, volatility, news, insider, sentiment];

        let unavailable = sections.iter().filter(|s| !s.is_available()).count();
        if unavailable == 0 {
            info!("Generated all reports for {ticker}");
        } else {
            warn!(
                "{unavailable} of {} reports for {ticker} are unavailable",
                sections.len()
            );
        }
        sections
    }

    /// One agent call, vetted and rendered
    async fn section(&self, request: ReportRequest) -> ReportSection {
        let payload = match self.agent.request_report(&request).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    subject = %request.subject,
                    kind = %request.kind,
                    transport = e.is_transport(),
                    "Agent call failed: {e}"
                );
                return ReportSection::unavailable(&request, e.to_string());
            }
        };

        let ctx = SectionContext::new(&request, &self.guardrails);
        match sections::render(payload, &ctx) {
            Ok(markdown) => ReportSection::rendered(&request, markdown),
            Err(reason) => {
                warn!(
                    subject = %request.subject,
                    kind = %request.kind,
                    "Section rejected: {reason}"
                );
                ReportSection::unavailable(&request, reason.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::MockReportAgent;
    use crate::domain::{AgentPayload, Subject};
    use crate::error::AgentError;
    use crate::sections::SectionBody;
    use crate::sections::test_support::run;
    use brief_llm::LLMError;
    use serde_json::json;

    fn good_body(kind: ReportKind) -> serde_json::Value {
        match kind {
            ReportKind::Historical => json!({"executive_summary": "Steady."}),
            ReportKind::Volatility => {
                json!({"metrics": {"historical_volatility": 21.0, "max_drawdown": -12.0}})
            }
            ReportKind::News => json!({"articles": [
                {"title": "Quarterly results", "source": "Reuters", "published_date": "2025-06-20"}
            ]}),
            ReportKind::Insider => json!({"recent_transactions": []}),
            ReportKind::Sentiment => json!({"market_sentiment": {
                "overall_sentiment": "Bullish", "sentiment_score": 0.4
            }}),
            ReportKind::MarketConditions => json!({
                "market_overview": {"overall_market_sentiment": "Neutral"},
                "major_indices": [{"name": "S&P 500", "current_value": 5400.0, "change_percent": 0.2}]
            }),
        }
    }

    #[tokio::test]
    async fn test_every_slot_is_filled() {
        let mut agent = MockReportAgent::new();
        agent
            .expect_request_report()
            .times(11)
            .returning(|req| Ok(AgentPayload::new(req.kind, good_body(req.kind))));

        let generator = ReportGenerator::new(Arc::new(agent), Guardrails::default());
        let set = generator.generate(&run()).await;

        assert_eq!(set.unavailable_count(), 0);
        for kind in ReportKind::PER_TICKER {
            let bundle = set.bundle(kind).unwrap();
            let order: Vec<_> = bundle
                .sections
                .iter()
                .map(|s| s.subject.as_ref().unwrap().as_str())
                .collect();
            assert_eq!(order, ["AAPL", "MSFT"], "{kind}");
        }
        assert_eq!(
            set.bundle(ReportKind::MarketConditions).unwrap().sections.len(),
            1
        );
    }

    #[tokio::test]
    async fn test_failures_are_contained() {
        let mut agent = MockReportAgent::new();
        agent.expect_request_report().returning(|req| {
            let ticker = req.subject.ticker().map(Ticker::as_str);
            match (ticker, req.kind) {
                (Some("AAPL"), ReportKind::News) => Err(AgentError::Provider(LLMError::Timeout(30))),
                (Some("MSFT"), ReportKind::Volatility) => Ok(AgentPayload::new(
                    req.kind,
                    json!({"metrics": {"historical_volatility": 900.0, "max_drawdown": -5.0}}),
                )),
                _ => Ok(AgentPayload::new(req.kind, good_body(req.kind))),
            }
        });

        let generator = ReportGenerator::new(Arc::new(agent), Guardrails::default());
        let set = generator.generate(&run()).await;

        assert_eq!(set.unavailable_count(), 2);
        let news = set.bundle(ReportKind::News).unwrap();
        assert!(matches!(news.sections[0].body, SectionBody::Unavailable { .. }));
        assert!(news.sections[1].is_available());
        let volatility = set.bundle(ReportKind::Volatility).unwrap();
        assert!(volatility.sections[0].is_available());
        assert!(!volatility.sections[1].is_available());
        // siblings of the failed call are unaffected
        assert!(set.bundle(ReportKind::Historical).unwrap().sections[0].is_available());
    }

    #[tokio::test]
    async fn test_market_request_covers_universe() {
        let mut agent = MockReportAgent::new();
        agent
            .expect_request_report()
            .withf(|req| req.kind == ReportKind::MarketConditions)
            .times(1)
            .returning(|req| {
                assert!(matches!(&req.subject, Subject::Universe(t) if t.len() == 2));
                Err(AgentError::EmptyResponse)
            });
        agent
            .expect_request_report()
            .returning(|req| Ok(AgentPayload::new(req.kind, good_body(req.kind))));

        let generator = ReportGenerator::new(Arc::new(agent), Guardrails::default());
        let set = generator.generate(&run()).await;

        let market = set.bundle(ReportKind::MarketConditions).unwrap();
        assert_eq!(market.unavailable_count(), 1);
        assert_eq!(set.unavailable_count(), 1);
    }
}
