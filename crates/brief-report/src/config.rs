//! Run parameters and guardrail policy

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::Ticker;
use crate::error::{ReportError, Result};
use crate::guardrails::RangeRule;
use crate::guardrails::placeholder::{DEFAULT_PLACEHOLDER_LITERALS, DEFAULT_PLACEHOLDER_PATTERNS};

/// Universe used when no tickers are configured
pub const DEFAULT_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "JPM", "JNJ", "PG", "XOM", "UNH", "CAT", "COST", "NEE", "WM", "O", "NVDA",
    "BRK-B", "LMT", "SBUX", "ALB", "BX", "VRTX", "ETSY", "APPS", "PLCE", "CENX", "PACW", "LNTH",
    "CRSP", "SAVA", "ARQT",
];

/// The default universe as validated tickers
pub fn default_tickers() -> Vec<Ticker> {
    DEFAULT_TICKERS
        .iter()
        .filter_map(|t| Ticker::new(t).ok())
        .collect()
}

/// Parameters for one report run
///
/// Passed explicitly into the generator; there is no global ticker list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    /// Tickers in output order
    pub tickers: Vec<Ticker>,

    /// Date every report is anchored to
    pub as_of: NaiveDate,

    /// Comparison index for price reports
    pub benchmark: Option<String>,

    /// Lookback window, e.g. `1y`
    pub period: String,

    /// Bar interval, e.g. `1d`
    pub interval: String,

    /// Where bundles are written
    pub output_dir: PathBuf,

    /// Tickers in flight at once; `None` means all of them
    pub max_concurrent_tickers: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            as_of: Local::now().date_naive(),
            benchmark: Some("SPY".to_string()),
            period: "1y".to_string(),
            interval: "1d".to_string(),
            output_dir: PathBuf::from("reports"),
            max_concurrent_tickers: None,
        }
    }
}

impl RunConfig {
    /// Create a new configuration builder
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tickers.is_empty() {
            return Err(ReportError::ConfigError(
                "at least one ticker is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for ticker in &self.tickers {
            if !seen.insert(ticker.as_str()) {
                return Err(ReportError::ConfigError(format!(
                    "ticker {ticker} is listed more than once"
                )));
            }
        }

        if self.period.trim().is_empty() || self.interval.trim().is_empty() {
            return Err(ReportError::ConfigError(
                "period and interval must not be empty".to_string(),
            ));
        }

        if self.max_concurrent_tickers == Some(0) {
            return Err(ReportError::ConfigError(
                "max_concurrent_tickers must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Effective number of tickers processed at once
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_tickers
            .unwrap_or(self.tickers.len())
            .clamp(1, self.tickers.len().max(1))
    }
}

/// Builder for RunConfig
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    tickers: Option<Vec<Ticker>>,
    as_of: Option<NaiveDate>,
    benchmark: Option<Option<String>>,
    period: Option<String>,
    interval: Option<String>,
    output_dir: Option<PathBuf>,
    max_concurrent_tickers: Option<usize>,
}

impl RunConfigBuilder {
    /// Set the ticker universe
    pub fn tickers(mut self, tickers: Vec<Ticker>) -> Self {
        self.tickers = Some(tickers);
        self
    }

    /// Set the as-of date
    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    /// Set the benchmark ticker
    pub fn benchmark(mut self, benchmark: impl Into<String>) -> Self {
        self.benchmark = Some(Some(benchmark.into()));
        self
    }

    /// Send no benchmark
    pub fn without_benchmark(mut self) -> Self {
        self.benchmark = Some(None);
        self
    }

    /// Set the lookback period
    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    /// Set the bar interval
    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Cap the number of tickers in flight
    pub fn max_concurrent_tickers(mut self, limit: usize) -> Self {
        self.max_concurrent_tickers = Some(limit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<RunConfig> {
        let defaults = RunConfig::default();

        let config = RunConfig {
            tickers: self.tickers.unwrap_or(defaults.tickers),
            as_of: self.as_of.unwrap_or(defaults.as_of),
            benchmark: self.benchmark.unwrap_or(defaults.benchmark),
            period: self.period.unwrap_or(defaults.period),
            interval: self.interval.unwrap_or(defaults.interval),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            max_concurrent_tickers: self.max_concurrent_tickers,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Guardrail policy: plausible ranges, staleness windows and display caps
///
/// Every field has a default, so a JSON file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    /// Price total return over the period, percent
    pub total_return: RangeRule,
    /// Annualised price volatility in the historical report, percent
    pub price_volatility: RangeRule,
    /// Historical volatility in the volatility report, percent
    pub historical_volatility: RangeRule,
    /// Maximum drawdown, percent (non-positive)
    pub max_drawdown: RangeRule,
    /// Dividend yield, percent
    pub dividend_yield: RangeRule,
    pub rsi: RangeRule,
    pub sentiment_score: RangeRule,
    pub confidence: RangeRule,
    pub correlation: RangeRule,
    /// Return over the benchmark, percentage points
    pub outperformance: RangeRule,
    /// Beta against the benchmark
    pub beta: RangeRule,
    pub put_call_ratio: RangeRule,
    pub vix: RangeRule,
    /// Daily change of a major index, percent
    pub index_change: RangeRule,
    /// Sector performance over the period, percent
    pub sector_change: RangeRule,

    /// Yields at or below this are read as fractions
    pub dividend_fraction_threshold: f64,

    pub news_max_age_days: u32,
    pub insider_max_age_days: u32,

    /// Articles shown per ticker
    pub max_articles: usize,
    /// Insider transactions shown per ticker
    pub max_transactions: usize,
    /// Article snippet length in characters
    pub snippet_chars: usize,

    /// Score magnitude tolerated against the stated direction
    pub direction_tolerance: f64,

    pub placeholder_literals: Vec<String>,
    pub placeholder_patterns: Vec<String>,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            total_return: RangeRule::new(-100.0, 400.0).with_clamp(0.0, 25.0),
            price_volatility: RangeRule::new(0.0, 200.0).with_clamp(0.0, 10.0),
            historical_volatility: RangeRule::new(0.0, 250.0).with_clamp(0.0, 10.0),
            max_drawdown: RangeRule::new(-100.0, 0.0),
            dividend_yield: RangeRule::new(0.0, 20.0).with_clamp(0.0, 5.0),
            rsi: RangeRule::new(0.0, 100.0).with_clamp(2.0, 2.0),
            sentiment_score: RangeRule::new(-1.0, 1.0).with_clamp(0.05, 0.05),
            confidence: RangeRule::new(0.0, 1.0).with_clamp(0.0, 0.05),
            correlation: RangeRule::new(-1.0, 1.0).with_clamp(0.02, 0.02),
            outperformance: RangeRule::new(-500.0, 1000.0),
            beta: RangeRule::new(-5.0, 10.0),
            put_call_ratio: RangeRule::new(0.0, 10.0),
            vix: RangeRule::new(0.0, 150.0),
            index_change: RangeRule::new(-50.0, 50.0),
            sector_change: RangeRule::new(-100.0, 500.0),
            dividend_fraction_threshold: 1.0,
            news_max_age_days: 120,
            insider_max_age_days: 365,
            max_articles: 3,
            max_transactions: 3,
            snippet_chars: 240,
            direction_tolerance: 0.0,
            placeholder_literals: DEFAULT_PLACEHOLDER_LITERALS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            placeholder_patterns: DEFAULT_PLACEHOLDER_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl GuardrailConfig {
    /// Load a policy from a JSON file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        info!("Loaded guardrail policy from {}", path.display());
        Ok(config)
    }

    /// Apply `NEWS_MAX_AGE_DAYS` and `INSIDER_MAX_AGE_DAYS` when set
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(days) = brief_utils::env_parse("NEWS_MAX_AGE_DAYS") {
            self.news_max_age_days = days;
        }
        if let Some(days) = brief_utils::env_parse("INSIDER_MAX_AGE_DAYS") {
            self.insider_max_age_days = days;
        }
        self
    }

    fn rules(&self) -> [(&'static str, &RangeRule); 15] {
        [
            ("total_return", &self.total_return),
            ("price_volatility", &self.price_volatility),
            ("historical_volatility", &self.historical_volatility),
            ("max_drawdown", &self.max_drawdown),
            ("dividend_yield", &self.dividend_yield),
            ("rsi", &self.rsi),
            ("sentiment_score", &self.sentiment_score),
            ("confidence", &self.confidence),
            ("correlation", &self.correlation),
            ("outperformance", &self.outperformance),
            ("beta", &self.beta),
            ("put_call_ratio", &self.put_call_ratio),
            ("vix", &self.vix),
            ("index_change", &self.index_change),
            ("sector_change", &self.sector_change),
        ]
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<()> {
        for (name, rule) in self.rules() {
            rule.validate(name).map_err(ReportError::ConfigError)?;
        }

        if !self.dividend_fraction_threshold.is_finite() || self.dividend_fraction_threshold < 0.0
        {
            return Err(ReportError::ConfigError(
                "dividend_fraction_threshold must be a non-negative number".to_string(),
            ));
        }

        if self.news_max_age_days == 0 || self.insider_max_age_days == 0 {
            return Err(ReportError::ConfigError(
                "staleness windows must be at least one day".to_string(),
            ));
        }

        if self.max_articles == 0 || self.max_transactions == 0 {
            return Err(ReportError::ConfigError(
                "max_articles and max_transactions must be greater than 0".to_string(),
            ));
        }

        if self.snippet_chars < 4 {
            return Err(ReportError::ConfigError(
                "snippet_chars must be at least 4".to_string(),
            ));
        }

        if !self.direction_tolerance.is_finite() || self.direction_tolerance < 0.0 {
            return Err(ReportError::ConfigError(
                "direction_tolerance must be a non-negative number".to_string(),
            ));
        }

        Ok(())
    }
}
