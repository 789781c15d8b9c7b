//! Scripted report agent shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use brief_report::{
    AgentError, AgentPayload, ReportAgent, ReportKind, ReportRequest, RunConfig, Ticker,
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

pub fn run_for(symbols: &[&str]) -> RunConfig {
    RunConfig::builder()
        .tickers(symbols.iter().map(|s| Ticker::new(s).unwrap()).collect())
        .as_of(as_of())
        .build()
        .unwrap()
}

/// A payload that passes every guardrail for its kind
pub fn valid_body(kind: ReportKind, subject: &str) -> Value {
    match kind {
        ReportKind::Historical => json!({
            "executive_summary": format!("{subject} delivered a steady year."),
            "price_analysis": {
                "total_return_percent": 12.0,
                "volatility": 22.0,
                "min_price": 100.0,
                "max_price": 140.0,
                "average_volume": 1_000_000,
                "trend_direction": "Upward"
            }
        }),
        ReportKind::Volatility => json!({
            "metrics": {"historical_volatility": 24.0, "max_drawdown": -14.0, "beta": 1.1}
        }),
        ReportKind::News => json!({
            "articles": [{
                "title": format!("{subject} beats estimates"),
                "source": "Reuters",
                "published_date": "2025-06-15",
                "content": "Revenue grew faster than expected."
            }]
        }),
        ReportKind::Insider => json!({
            "recent_transactions": [{
                "name": "Jane Q. Realperson",
                "title": "Director",
                "transaction_type": "Purchase",
                "shares": 1000,
                "price": 120.0,
                "value": 120_000.0,
                "transaction_date": "2025-05-02"
            }]
        }),
        ReportKind::Sentiment => json!({
            "market_sentiment": {"overall_sentiment": "Positive", "sentiment_score": 0.3}
        }),
        ReportKind::MarketConditions => json!({
            "market_overview": {"overall_market_sentiment": "Constructive", "vix_level": 14.2},
            "major_indices": [
                {"name": "S&P 500", "symbol": "SPX", "current_value": 5500.0, "change_percent": 0.4}
            ]
        }),
    }
}

type Script = Box<dyn Fn(&ReportRequest) -> Result<Value, AgentError> + Send + Sync>;

/// Agent answering from a script, with per-ticker latency and call bookkeeping
pub struct ScriptedAgent {
    script: Script,
    delays_ms: HashMap<String, u64>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    resolved_per_ticker: AtomicUsize,
    resolved_before_market: Mutex<Option<usize>>,
    calls: Mutex<Vec<(String, ReportKind)>>,
}

impl ScriptedAgent {
    pub fn new(
        script: impl Fn(&ReportRequest) -> Result<Value, AgentError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            delays_ms: HashMap::new(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            resolved_per_ticker: AtomicUsize::new(0),
            resolved_before_market: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Agent that answers every request with a valid payload
    pub fn valid() -> Self {
        Self::new(|req| Ok(valid_body(req.kind, &req.subject.to_string())))
    }

    pub fn with_delay(mut self, ticker: &str, millis: u64) -> Self {
        self.delays_ms.insert(ticker.to_string(), millis);
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Per-ticker calls that had resolved when the market call arrived
    pub fn resolved_before_market(&self) -> Option<usize> {
        *self.resolved_before_market.lock().unwrap()
    }

    /// Calls in the order they were issued
    pub fn calls(&self) -> Vec<(String, ReportKind)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportAgent for ScriptedAgent {
    async fn request_report(&self, request: &ReportRequest) -> Result<AgentPayload, AgentError> {
        let subject = request.subject.to_string();
        self.calls.lock().unwrap().push((subject.clone(), request.kind));

        if request.kind.is_cross_ticker() {
            let resolved = self.resolved_per_ticker.load(Ordering::SeqCst);
            *self.resolved_before_market.lock().unwrap() = Some(resolved);
            return (self.script)(request).map(|body| AgentPayload::new(request.kind, body));
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays_ms.get(&subject).copied().unwrap_or(1);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        let answer = (self.script)(request);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.resolved_per_ticker.fetch_add(1, Ordering::SeqCst);
        answer.map(|body| AgentPayload::new(request.kind, body))
    }
}
