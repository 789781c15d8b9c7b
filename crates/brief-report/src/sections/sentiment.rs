//! Multi-source sentiment section

use serde::Deserialize;

use super::{QUALITY_NOTE, SectionContext, bullet, bullet_list, paragraph};
use crate::domain::{AgentPayload, lenient};
use crate::format;
use crate::guardrails::Rejection;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSentiment {
    #[serde(deserialize_with = "lenient::record")]
    market_sentiment: Option<RawMarketSentiment>,
    #[serde(deserialize_with = "lenient::record")]
    options_flow: Option<RawOptionsFlow>,
    #[serde(deserialize_with = "lenient::text")]
    social_sentiment: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    analyst_sentiment: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    key_insights: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMarketSentiment {
    #[serde(deserialize_with = "lenient::text")]
    overall_sentiment: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    sentiment_score: Option<f64>,
    #[serde(deserialize_with = "lenient::text_list")]
    sentiment_trend: Vec<String>,
    #[serde(deserialize_with = "lenient::records")]
    sources: Vec<Option<RawSource>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSource {
    #[serde(deserialize_with = "lenient::text")]
    source_type: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    sentiment_score: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    confidence_level: Option<f64>,
    #[serde(deserialize_with = "lenient::text_list")]
    key_indicators: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOptionsFlow {
    #[serde(deserialize_with = "lenient::number")]
    put_call_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient::text_list")]
    unusual_activity: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    institutional_sentiment: Option<String>,
}

fn write_source(out: &mut String, raw: &RawSource, ctx: &SectionContext<'_>) -> Result<(), Rejection> {
    let policy = ctx.guardrails.config();
    let source = ctx.require(ctx.guardrails.text("source_type", raw.source_type.as_deref()))?;
    let score = ctx.require(
        policy
            .sentiment_score
            .check_opt("sentiment_score", raw.sentiment_score),
    )?;
    let confidence = ctx.require(
        policy
            .confidence
            .check_opt("confidence_level", raw.confidence_level),
    )?;

    out.push_str(&format!(
        "- **{source}:** {} ({} confidence)\n",
        format::ratio(score),
        format::ratio(confidence)
    ));
    out.push_str(&format!(
        "  - Indicators: {}\n\n",
        format::list(&ctx.guardrails.list(&raw.key_indicators))
    ));
    Ok(())
}

fn write_options(out: &mut String, raw: &RawOptionsFlow, ctx: &SectionContext<'_>) {
    out.push_str("### Options Flow\n");

    let ratio = ctx.keep(
        ctx.guardrails
            .config()
            .put_call_ratio
            .check_opt("put_call_ratio", raw.put_call_ratio),
    );
    let Some(ratio) = ratio else {
        out.push_str(QUALITY_NOTE);
        out.push_str("\n\n");
        return;
    };

    let unusual = ctx.guardrails.list(&raw.unusual_activity);
    bullet(out, "Put/Call Ratio", format::ratio(ratio));
    bullet(
        out,
        "Unusual Activity",
        if unusual.is_empty() {
            "None noted".to_string()
        } else {
            unusual.join(", ")
        },
    );
    bullet(
        out,
        "Institutional Sentiment",
        ctx.text_or_na(raw.institutional_sentiment.as_deref()),
    );
    out.push('\n');
}

/// Render the sentiment section
///
/// The overall label and score are required and must agree in direction.
pub fn render(payload: AgentPayload, ctx: &SectionContext<'_>) -> Result<String, Rejection> {
    let raw: RawSentiment = payload.decode()?;
    let market = raw.market_sentiment.unwrap_or_default();

    let label = ctx.require(
        ctx.guardrails
            .text("overall_sentiment", market.overall_sentiment.as_deref()),
    )?;
    let score = ctx.require(
        ctx.guardrails
            .config()
            .sentiment_score
            .check_opt("sentiment_score", market.sentiment_score),
    )?;
    ctx.require(ctx.guardrails.direction("overall_sentiment", &label, score))?;

    let mut out = String::new();
    out.push_str("### Market Sentiment\n");
    bullet(&mut out, "Overall Sentiment", &label);
    bullet(&mut out, "Sentiment Score", format::ratio(score));
    bullet(
        &mut out,
        "Sentiment Trend",
        format::list(&ctx.guardrails.list(&market.sentiment_trend)),
    );
    out.push('\n');

    if !market.sources.is_empty() {
        out.push_str("### Sources Breakdown\n");
        let mut written = 0;
        for source in market.sources.iter().flatten() {
            match write_source(&mut out, source, ctx) {
                Ok(()) => written += 1,
                Err(reason) => ctx.log_rejection(&reason),
            }
        }
        if written == 0 {
            out.push_str(QUALITY_NOTE);
            out.push_str("\n\n");
        }
    }

    if let Some(options) = &raw.options_flow {
        write_options(&mut out, options, ctx);
    }

    paragraph(
        &mut out,
        "### Social Sentiment",
        &ctx.text_or_na(raw.social_sentiment.as_deref()),
    );
    paragraph(
        &mut out,
        "### Analyst Sentiment",
        &ctx.text_or_na(raw.analyst_sentiment.as_deref()),
    );
    bullet_list(
        &mut out,
        "### Key Insights",
        &ctx.guardrails.list(&raw.key_insights),
    );

    Ok(out)
}
