//! Requests sent to the report agent

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::{ReportKind, Ticker};
use crate::config::RunConfig;

/// What a request is about: one ticker or the whole universe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Ticker(Ticker),
    Universe(Vec<Ticker>),
}

impl Subject {
    /// The single ticker, if this is a per-ticker subject
    pub fn ticker(&self) -> Option<&Ticker> {
        match self {
            Self::Ticker(t) => Some(t),
            Self::Universe(_) => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticker(t) => write!(f, "{t}"),
            Self::Universe(tickers) => write!(f, "universe of {}", tickers.len()),
        }
    }
}

/// One agent call: a report kind for a subject as of a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub subject: Subject,
    pub as_of: NaiveDate,
    /// Comparison index; only sent for kinds that use one
    pub benchmark: Option<String>,
    pub period: String,
    pub interval: String,
}

impl ReportRequest {
    /// Build the request for `kind` about `subject` from the run parameters
    pub fn new(kind: ReportKind, subject: Subject, run: &RunConfig) -> Self {
        let benchmark = match kind {
            ReportKind::Historical | ReportKind::Volatility => run.benchmark.clone(),
            _ => None,
        };

        Self {
            kind,
            subject,
            as_of: run.as_of,
            benchmark,
            period: run.period.clone(),
            interval: run.interval.clone(),
        }
    }

    /// Per-ticker request
    pub fn for_ticker(kind: ReportKind, ticker: &Ticker, run: &RunConfig) -> Self {
        Self::new(kind, Subject::Ticker(ticker.clone()), run)
    }

    /// Cross-ticker market conditions request
    pub fn market_conditions(run: &RunConfig) -> Self {
        Self::new(
            ReportKind::MarketConditions,
            Subject::Universe(run.tickers.clone()),
            run,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> RunConfig {
        RunConfig::builder()
            .tickers(vec![Ticker::new("AAPL").unwrap(), Ticker::new("MSFT").unwrap()])
            .as_of(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap())
            .benchmark("QQQ")
            .build()
            .unwrap()
    }

    #[test]
    fn test_benchmark_only_for_price_kinds() {
        let run = run();
        let aapl = Ticker::new("AAPL").unwrap();

        let hist = ReportRequest::for_ticker(ReportKind::Historical, &aapl, &run);
        assert_eq!(hist.benchmark.as_deref(), Some("QQQ"));
        assert_eq!(hist.subject.ticker(), Some(&aapl));

        let news = ReportRequest::for_ticker(ReportKind::News, &aapl, &run);
        assert_eq!(news.benchmark, None);
        assert_eq!(news.period, "1y");
    }

    #[test]
    fn test_market_request_carries_universe() {
        let run = run();
        let req = ReportRequest::market_conditions(&run);
        assert_eq!(req.kind, ReportKind::MarketConditions);
        assert_eq!(req.subject, Subject::Universe(run.tickers.clone()));
        assert_eq!(req.subject.to_string(), "universe of 2");
        assert_eq!(req.as_of, run.as_of);
    }
}
