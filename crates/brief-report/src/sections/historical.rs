//! Historical performance section

use serde::Deserialize;

use super::{QUALITY_NOTE, SectionContext, bullet, bullet_list, paragraph};
use crate::domain::{AgentPayload, lenient};
use crate::format;
use crate::guardrails::{Rejection, finite, positive};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHistorical {
    #[serde(deserialize_with = "lenient::text")]
    executive_summary: Option<String>,
    #[serde(deserialize_with = "lenient::record")]
    price_analysis: Option<RawPriceAnalysis>,
    #[serde(deserialize_with = "lenient::record")]
    fundamental_analysis: Option<RawFundamentals>,
    #[serde(deserialize_with = "lenient::record")]
    technical_analysis: Option<RawTechnicals>,
    #[serde(deserialize_with = "lenient::record")]
    market_comparison: Option<RawMarketComparison>,
    #[serde(deserialize_with = "lenient::text")]
    risk_assessment: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    investment_outlook: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    key_recommendations: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPriceAnalysis {
    #[serde(deserialize_with = "lenient::number")]
    total_return_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    volatility: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    min_price: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    max_price: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    average_volume: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    trend_direction: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFundamentals {
    #[serde(deserialize_with = "lenient::number")]
    pe_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    forward_pe_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    peg_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    price_to_book: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    dividend_yield: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    fifty_two_week_high: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    fifty_two_week_low: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTechnicals {
    #[serde(deserialize_with = "lenient::number")]
    sma_20: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    sma_50: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    rsi: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    support_level: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    resistance_level: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMarketComparison {
    #[serde(deserialize_with = "lenient::text")]
    benchmark_ticker: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    outperformance_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    beta: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    correlation: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    relative_strength: Option<String>,
}

/// Price block values after vetting
struct PriceSummary {
    total_return: f64,
    volatility: f64,
    min_price: f64,
    max_price: f64,
    average_volume: f64,
    trend: String,
}

fn vet_price(raw: &RawPriceAnalysis, ctx: &SectionContext<'_>) -> Result<PriceSummary, Rejection> {
    let policy = ctx.guardrails.config();

    let total_return = ctx.require(
        policy
            .total_return
            .check_opt("total_return_percent", raw.total_return_percent),
    )?;
    let volatility = ctx.require(policy.price_volatility.check_opt("volatility", raw.volatility))?;
    let min_price = ctx.require(positive("min_price", raw.min_price))?;
    let max_price = ctx.require(positive("max_price", raw.max_price))?;
    let average_volume = ctx.require(positive("average_volume", raw.average_volume))?;

    if min_price >= max_price {
        return Err(Rejection::Inconsistent(format!(
            "min_price {min_price} is not below max_price {max_price}"
        )));
    }

    let trend = ctx.require(
        ctx.guardrails
            .text("trend_direction", raw.trend_direction.as_deref()),
    )?;
    ctx.require(ctx.guardrails.direction("trend_direction", &trend, total_return))?;

    Ok(PriceSummary {
        total_return,
        volatility,
        min_price,
        max_price,
        average_volume,
        trend,
    })
}

fn write_price(out: &mut String, raw: Option<&RawPriceAnalysis>, ctx: &SectionContext<'_>) {
    out.push_str("### Price Analysis\n");

    let vetted = raw.map(|raw| vet_price(raw, ctx));
    match vetted {
        Some(Ok(price)) => {
            let period = &ctx.request.period;
            bullet(
                out,
                &format!("Total Return ({period})"),
                format::signed_percent(price.total_return),
            );
            bullet(out, "Volatility", format::percent(price.volatility));
            bullet(
                out,
                &format!("Price Range ({period})"),
                format!(
                    "{} - {}",
                    format::currency(price.min_price),
                    format::currency(price.max_price)
                ),
            );
            bullet(out, "Average Volume", format::integer(price.average_volume));
            bullet(out, "Trend Direction", &price.trend);
            out.push('\n');
        }
        Some(Err(reason)) => {
            ctx.log_rejection(&reason);
            out.push_str(QUALITY_NOTE);
            out.push_str("\n\n");
        }
        None => {
            out.push_str(QUALITY_NOTE);
            out.push_str("\n\n");
        }
    }
}

fn write_fundamentals(out: &mut String, raw: &RawFundamentals, ctx: &SectionContext<'_>) {
    let ratio = |field, value| ctx.keep(finite(field, value)).map(format::ratio);
    let price = |field, value| ctx.keep(positive(field, value));

    let mut high = price("fifty_two_week_high", raw.fifty_two_week_high);
    let mut low = price("fifty_two_week_low", raw.fifty_two_week_low);
    if let (Some(h), Some(l)) = (high, low) {
        if l > h {
            ctx.log_rejection(&Rejection::Inconsistent(format!(
                "52-week low {l} exceeds 52-week high {h}"
            )));
            high = None;
            low = None;
        }
    }

    let dividend = ctx.keep(ctx.guardrails.dividend_yield(raw.dividend_yield));

    out.push_str("### Fundamental Analysis\n");
    bullet(out, "P/E Ratio", format::or_na(ratio("pe_ratio", raw.pe_ratio), |v| v));
    bullet(
        out,
        "Forward P/E Ratio",
        format::or_na(ratio("forward_pe_ratio", raw.forward_pe_ratio), |v| v),
    );
    bullet(out, "PEG Ratio", format::or_na(ratio("peg_ratio", raw.peg_ratio), |v| v));
    bullet(
        out,
        "Price-to-Book Ratio",
        format::or_na(ratio("price_to_book", raw.price_to_book), |v| v),
    );
    bullet(out, "Dividend Yield", format::or_na(dividend, format::percent));
    bullet(out, "52-Week High", format::or_na(high, format::currency));
    bullet(out, "52-Week Low", format::or_na(low, format::currency));
    out.push('\n');
}

fn write_technicals(out: &mut String, raw: &RawTechnicals, ctx: &SectionContext<'_>) {
    let price = |field, value| ctx.keep(positive(field, value));
    let rsi = ctx.keep(ctx.guardrails.config().rsi.check_opt("rsi", raw.rsi));

    out.push_str("### Technical Analysis\n");
    bullet(out, "20-Day SMA", format::or_na(price("sma_20", raw.sma_20), format::currency));
    bullet(out, "50-Day SMA", format::or_na(price("sma_50", raw.sma_50), format::currency));
    bullet(out, "RSI", format::or_na(rsi, format::ratio));
    bullet(
        out,
        "Support Level",
        format::or_na(price("support_level", raw.support_level), format::currency),
    );
    bullet(
        out,
        "Resistance Level",
        format::or_na(price("resistance_level", raw.resistance_level), format::currency),
    );
    out.push('\n');
}

fn write_comparison(out: &mut String, raw: &RawMarketComparison, ctx: &SectionContext<'_>) {
    let benchmark = ctx
        .guardrails
        .text_opt(raw.benchmark_ticker.as_deref())
        .or_else(|| ctx.request.benchmark.clone())
        .unwrap_or_else(|| format::NOT_AVAILABLE.to_string());
    let policy = ctx.guardrails.config();
    let outperformance = ctx.keep(
        policy
            .outperformance
            .check_opt("outperformance_percent", raw.outperformance_percent),
    );
    let beta = ctx.keep(policy.beta.check_opt("beta", raw.beta));
    let correlation = ctx.keep(policy.correlation.check_opt("correlation", raw.correlation));

    out.push_str(&format!("### Market Comparison (vs. {benchmark})\n"));
    bullet(out, "Outperformance", format::or_na(outperformance, format::signed_percent));
    bullet(out, "Beta", format::or_na(beta, format::ratio));
    bullet(out, "Correlation", format::or_na(correlation, format::ratio));
    bullet(
        out,
        "Relative Strength",
        ctx.text_or_na(raw.relative_strength.as_deref()),
    );
    out.push('\n');
}

/// Render the historical section
///
/// Requires a usable executive summary; every other block degrades on its
/// own.
pub fn render(payload: AgentPayload, ctx: &SectionContext<'_>) -> Result<String, Rejection> {
    let raw: RawHistorical = payload.decode()?;

    let summary = ctx.require(
        ctx.guardrails
            .text("executive_summary", raw.executive_summary.as_deref()),
    )?;

    let mut out = String::new();
    paragraph(&mut out, "### Executive Summary", &summary);

    write_price(&mut out, raw.price_analysis.as_ref(), ctx);

    if let Some(fundamentals) = &raw.fundamental_analysis {
        write_fundamentals(&mut out, fundamentals, ctx);
    }
    if let Some(technicals) = &raw.technical_analysis {
        write_technicals(&mut out, technicals, ctx);
    }
    if let Some(comparison) = &raw.market_comparison {
        write_comparison(&mut out, comparison, ctx);
    }

    paragraph(
        &mut out,
        "### Risk Assessment",
        &ctx.text_or_na(raw.risk_assessment.as_deref()),
    );
    paragraph(
        &mut out,
        "### Investment Outlook",
        &ctx.text_or_na(raw.investment_outlook.as_deref()),
    );
    bullet_list(
        &mut out,
        "### Key Recommendations",
        &ctx.guardrails.list(&raw.key_recommendations),
    );

    Ok(out)
}
