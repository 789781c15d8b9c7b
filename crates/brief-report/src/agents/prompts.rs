//! Prompt templates for the report agent

use minijinja::{Environment, context};

use crate::domain::{ReportKind, ReportRequest, Subject, Ticker};
use crate::format;

const SYSTEM_PROMPT: &str = "\
You are a meticulous equity research assistant. Answer with a single JSON \
object and nothing else. Use only information you can attribute to a real, \
dated source. When a value is unknown, use null instead of guessing. Never \
invent people, articles or placeholder names. Percentages are plain numbers \
(12.5 means 12.5%) unless a key says it is a fraction. Dates are ISO 8601 \
(YYYY-MM-DD).";

const PREAMBLE: &str = "\
{% if ticker %}Ticker: {{ ticker }}{% else %}Universe: {{ tickers | join(', ') }}{% endif %}
As of: {{ as_of }}
{% if benchmark %}Benchmark: {{ benchmark }}
{% endif %}Period: {{ period }}
Interval: {{ interval }}
";

const HISTORICAL: &str = r#"{% include "preamble" %}
Write a historical performance analysis of {{ ticker }} over the period.
Return JSON with these keys:
- executive_summary: string
- price_analysis: {total_return_percent, volatility, min_price, max_price, average_volume, trend_direction}
- fundamental_analysis: {pe_ratio, forward_pe_ratio, peg_ratio, price_to_book, dividend_yield (a fraction: 0.0044 means 0.44%), fifty_two_week_high, fifty_two_week_low}
- technical_analysis: {sma_20, sma_50, rsi, support_level, resistance_level}
- market_comparison: {benchmark_ticker, outperformance_percent, beta, correlation, relative_strength}
- risk_assessment: string
- investment_outlook: string
- key_recommendations: [string]
"#;

const VOLATILITY: &str = r#"{% include "preamble" %}
Assess the volatility and risk profile of {{ ticker }}.
Return JSON with these keys:
- metrics: {historical_volatility (annualised percent), beta, sharpe_ratio, max_drawdown (percent, zero or negative), volatility_regime}
- risk_assessment: {overall_risk_level, volatility_trends: [string], risk_factors: [string], hedging_recommendations: [string]}
- outlook: string
- key_insights: [string]
"#;

const NEWS: &str = r#"{% include "preamble" %}
Summarise news coverage of {{ ticker }} published in the {{ news_window_days }} days up to {{ as_of }}.
Only include articles you can date; newest first.
Return JSON with these keys:
- articles: [{title, source, published_date, content}]
- sentiment_analysis: {overall_sentiment, sentiment_trend: [string], key_themes: [string], market_impact_assessment}
- summary: string
- key_insights: [string]
"#;

const INSIDER: &str = r#"{% include "preamble" %}
Report insider transactions in {{ ticker }} filed in the {{ insider_window_days }} days up to {{ as_of }}.
Use the insiders' real names as filed. Return an empty list when there were none.
Return JSON with these keys:
- recent_transactions: [{name, title, transaction_type, shares, price, value, transaction_date}]
- activity_summary: {total_buy_volume, total_sell_volume, net_insider_activity (dollars, negative for net selling), key_insiders: [string], activity_trend}
- significance_assessment: string
- key_insights: [string]
"#;

const SENTIMENT: &str = r#"{% include "preamble" %}
Measure market sentiment toward {{ ticker }}.
Scores range from -1 (very bearish) to 1 (very bullish); confidence from 0 to 1.
Return JSON with these keys:
- market_sentiment: {overall_sentiment, sentiment_score, sentiment_trend: [string], sources: [{source_type, sentiment_score, confidence_level, key_indicators: [string]}]}
- options_flow: {put_call_ratio, unusual_activity: [string], institutional_sentiment}
- social_sentiment: string
- analyst_sentiment: string
- key_insights: [string]
"#;

const MARKET: &str = r#"{% include "preamble" %}
Describe general market conditions as of {{ as_of }} for an investor holding the universe above.
Return JSON with these keys:
- market_overview: {overall_market_sentiment, vix_level, market_breadth, key_drivers: [string]}
- major_indices: [{name, symbol, current_value, change_percent}]
- economic_indicators: [{name, value, change, significance}]
- sector_performance: [{sector_name, performance_percent, trend, leading_stocks: [string]}]
- outlook: string
- key_insights: [string]
"#;

/// Compiled prompt templates, one per report kind
#[derive(Debug)]
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("preamble", PREAMBLE)?;
        for kind in ReportKind::ALL {
            env.add_template(kind.slug(), template_source(kind))?;
        }
        Ok(Self { env })
    }

    /// Instructions sent as the system prompt
    pub fn system(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    /// User prompt for one request
    pub fn render(
        &self,
        request: &ReportRequest,
        news_window_days: u32,
        insider_window_days: u32,
    ) -> Result<String, minijinja::Error> {
        let tickers: Vec<&str> = match &request.subject {
            Subject::Ticker(t) => vec![t.as_str()],
            Subject::Universe(all) => all.iter().map(Ticker::as_str).collect(),
        };

        self.env.get_template(request.kind.slug())?.render(context! {
            ticker => request.subject.ticker().map(Ticker::as_str),
            tickers => tickers,
            as_of => format::date(request.as_of),
            benchmark => request.benchmark.as_deref(),
            period => &request.period,
            interval => &request.interval,
            news_window_days => news_window_days,
            insider_window_days => insider_window_days,
        })
    }
}

fn template_source(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Historical => HISTORICAL,
        ReportKind::Volatility => VOLATILITY,
        ReportKind::News => NEWS,
        ReportKind::Insider => INSIDER,
        ReportKind::Sentiment => SENTIMENT,
        ReportKind::MarketConditions => MARKET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardrails::Guardrails;
    use crate::sections::test_support::request;

    #[test]
    fn test_every_kind_renders() {
        let library = PromptLibrary::new().unwrap();
        for kind in ReportKind::ALL {
            let prompt = library.render(&request(kind), 120, 365).unwrap();
            assert!(prompt.contains("As of: 2025-06-30"), "{kind}: {prompt}");
        }
    }

    #[test]
    fn test_ticker_prompt() {
        let library = PromptLibrary::new().unwrap();
        let prompt = library
            .render(&request(ReportKind::Historical), 120, 365)
            .unwrap();
        assert!(prompt.starts_with("Ticker: AAPL\n"));
        assert!(prompt.contains("Benchmark: SPY"));
        assert!(prompt.contains("analysis of AAPL"));
    }

    #[test]
    fn test_dividend_unit_matches_guardrail_reading() {
        let library = PromptLibrary::new().unwrap();
        let prompt = library
            .render(&request(ReportKind::Historical), 120, 365)
            .unwrap();
        assert!(prompt.contains("dividend_yield (a fraction: 0.0044 means 0.44%)"));

        // every fractional yield an agent can send is read as that fraction
        let guardrails = Guardrails::default();
        for (fraction, percent) in [(0.0044, 0.44), (0.0003, 0.03), (0.032, 3.2), (0.12, 12.0)] {
            let read = guardrails.dividend_yield(Some(fraction)).ok().unwrap();
            assert!((read - percent).abs() < 1e-9, "{fraction} read as {read}");
        }
    }

    #[test]
    fn test_news_prompt_carries_window() {
        let library = PromptLibrary::new().unwrap();
        let prompt = library.render(&request(ReportKind::News), 90, 365).unwrap();
        assert!(prompt.contains("in the 90 days up to 2025-06-30"));
        assert!(!prompt.contains("Benchmark:"));
    }

    #[test]
    fn test_market_prompt_lists_universe() {
        let library = PromptLibrary::new().unwrap();
        let prompt = library
            .render(&request(ReportKind::MarketConditions), 120, 365)
            .unwrap();
        assert!(prompt.starts_with("Universe: AAPL, MSFT\n"));
    }
}
